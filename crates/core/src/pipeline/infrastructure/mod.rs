pub mod threaded_face_executor;
