pub mod classifier_recording;
mod overlap;
pub mod replay_face_detector;
pub mod replay_landmark_detector;
pub mod replay_pupil_locator;
