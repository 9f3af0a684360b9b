pub mod landmark_pose_classifier;
pub mod scripted_detector;
