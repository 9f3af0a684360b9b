pub mod face_detector;
pub mod face_landmarks;
pub mod head_pose;
pub mod pose_classifier;
pub mod pose_estimator;
