pub mod scripted_frame_source;
