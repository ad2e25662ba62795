//! Face, pupil and facial landmark detection pipeline.
//!
//! Stage 1 finds faces, stage 2 places pupils from face geometry and stage 3
//! refines named landmark groups anchored on the pupil pair. Classifiers are
//! consumed through the ports in [`detection::domain`].

pub mod detection {
    pub mod domain {
        pub mod eye_geometry;
        pub mod face_detection;
        pub mod face_detector;
        pub mod landmark_catalog;
        pub mod landmark_detector;
        pub mod landmark_point;
        pub mod pupil;
        pub mod pupil_locator;
        pub mod traversal_plan;
    }
    pub mod infrastructure;
}

pub mod io {
    pub mod image_file;
    pub mod io_error;
    pub mod json_store;
}

pub mod pipeline {
    pub mod detect_landmarks_use_case;
    pub mod face_executor;
    pub mod infrastructure;
    pub mod pipeline_config;
    pub mod pipeline_context;
    pub mod pipeline_logger;
    pub mod result_aggregator;
}

pub mod render {
    pub mod domain {
        pub mod render_sink;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod error;
    pub mod gray_image;
}
