pub mod jpeg_capture;
