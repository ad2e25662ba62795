use std::time::Instant;

use crate::detection::domain::eye_geometry::{derive_eye_seed, EyeSide};
use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::pupil::{PupilEstimate, SeedWindow};
use crate::detection::domain::traversal_plan::Invocation;
use crate::pipeline::face_executor::{FaceExecutor, SequentialFaceExecutor};
use crate::pipeline::pipeline_context::PipelineContext;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::pipeline::result_aggregator::{aggregate, DetectionResult, FaceResultBuilder};
use crate::shared::constants::PUPIL_ROTATION_ANGLE;
use crate::shared::error::{ClassifierPort, PipelineError};
use crate::shared::gray_image::{GrayImage, ImageParams};

/// What happens when refining one face fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failure aborts the whole image and no result is returned.
    #[default]
    AbortRun,
    /// The failing face is logged and left out; other faces are still returned.
    IsolateFace,
}

/// Three-stage landmark pipeline: faces → pupils → landmark refinement.
///
/// Stage 1 runs to completion before any face is refined. Each accepted face
/// is then refined independently by the configured [`FaceExecutor`].
pub struct DetectLandmarksUseCase {
    context: PipelineContext,
    executor: Box<dyn FaceExecutor>,
    logger: Box<dyn PipelineLogger>,
    failure_policy: FailurePolicy,
}

impl DetectLandmarksUseCase {
    pub fn new(context: PipelineContext) -> Self {
        Self {
            context,
            executor: Box::new(SequentialFaceExecutor),
            logger: Box::new(NullPipelineLogger),
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_executor(mut self, executor: Box<dyn FaceExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Runs all stages on one image and returns one result per clustered face,
    /// in detection order.
    pub fn execute(&mut self, image: &GrayImage) -> Result<Vec<DetectionResult>, PipelineError> {
        let params = image.params();
        let threshold = self.context.config().quality_threshold;

        let start = Instant::now();
        let faces = detect_faces(&self.context, &params)?;
        self.logger.timing("faces", elapsed_ms(start));

        let accepted: Vec<FaceDetection> = faces
            .iter()
            .filter(|f| f.passes_quality_gate(threshold))
            .copied()
            .collect();
        self.logger.metric("faces_detected", faces.len() as f64);
        self.logger.metric("faces_accepted", accepted.len() as f64);
        log::debug!(
            "{} faces after clustering, {} above quality threshold {threshold}",
            faces.len(),
            accepted.len()
        );

        let context = &self.context;
        let invocations = context.plan().invocations(context.catalog())?;
        let job = |face: &FaceDetection| refine_face(context, &invocations, &params, face);

        let start = Instant::now();
        let outcomes = self.executor.execute(&accepted, &job);
        self.logger.timing("refine", elapsed_ms(start));

        let refined = collect_refined(self.failure_policy, &accepted, outcomes)?;
        let refined_count = refined.iter().flatten().count();
        self.logger.progress(refined_count, accepted.len());

        let results = aggregate(&faces, threshold, refined);
        let landmarks: usize = results.iter().map(|r| r.landmarks.len()).sum();
        self.logger.metric("landmarks_kept", landmarks as f64);
        self.logger.info(&format!(
            "Detected {} faces ({refined_count} refined, {landmarks} landmarks)",
            results.len()
        ));
        self.logger.image_finished();

        Ok(results)
    }

    pub fn summary(&self) {
        self.logger.summary();
    }
}

/// Stage 1: scan, cluster. The quality gate is applied by the caller.
fn detect_faces(
    context: &PipelineContext,
    image: &ImageParams<'_>,
) -> Result<Vec<FaceDetection>, PipelineError> {
    let config = context.config();
    let detector = context.face_detector();
    let raw = detector
        .detect(image, &config.detection, config.rotation_angle)
        .map_err(|e| PipelineError::classifier(ClassifierPort::FaceDetector, e))?;
    log::debug!("{} raw face candidates", raw.len());
    detector
        .cluster(raw, config.cluster_overlap_threshold)
        .map_err(|e| PipelineError::classifier(ClassifierPort::FaceDetector, e))
}

/// Stages 2 and 3 for one accepted face.
fn refine_face(
    context: &PipelineContext,
    invocations: &[Invocation<'_>],
    image: &ImageParams<'_>,
    face: &FaceDetection,
) -> Result<DetectionResult, PipelineError> {
    let left_seed = derive_eye_seed(face, EyeSide::Left);
    let right_seed = derive_eye_seed(face, EyeSide::Right);
    let left = locate_pupil(context, &left_seed, image)?;
    let right = locate_pupil(context, &right_seed, image)?;

    let mut builder = FaceResultBuilder::new(*face);
    builder.pupils(left, right);

    // Invalid pupils still anchor the landmark search.
    for call in invocations {
        let estimate = call
            .detector
            .locate(
                &left,
                &right,
                image,
                left_seed.perturb_count,
                call.orientation.is_flipped(),
            )
            .map_err(|e| {
                PipelineError::classifier(
                    ClassifierPort::LandmarkDetector {
                        group: call.group.to_string(),
                    },
                    e,
                )
            })?;
        builder.push_landmark(estimate);
    }

    Ok(builder.build())
}

fn locate_pupil(
    context: &PipelineContext,
    seed: &SeedWindow,
    image: &ImageParams<'_>,
) -> Result<PupilEstimate, PipelineError> {
    context
        .pupil_locator()
        .locate(seed, image, PUPIL_ROTATION_ANGLE, false)
        .map_err(|e| PipelineError::classifier(ClassifierPort::PupilLocator, e))
}

fn collect_refined(
    policy: FailurePolicy,
    accepted: &[FaceDetection],
    outcomes: Vec<Result<DetectionResult, PipelineError>>,
) -> Result<Vec<Option<DetectionResult>>, PipelineError> {
    let mut refined = Vec::with_capacity(outcomes.len());
    for (face, outcome) in accepted.iter().zip(outcomes) {
        match outcome {
            Ok(result) => refined.push(Some(result)),
            Err(e) if policy == FailurePolicy::IsolateFace => {
                log::warn!("Skipping face at ({}, {}): {e}", face.row, face.col);
                refined.push(None);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(refined)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face_detector::{DetectionParams, FaceDetector};
    use crate::detection::domain::landmark_catalog::LandmarkCatalog;
    use crate::detection::domain::landmark_detector::LandmarkDetector;
    use crate::detection::domain::landmark_point::{LandmarkEstimate, PointKind};
    use crate::detection::domain::pupil_locator::PupilLocator;
    use crate::pipeline::infrastructure::threaded_face_executor::ThreadedFaceExecutor;
    use crate::pipeline::pipeline_config::PipelineConfig;
    use crate::shared::error::PortError;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    // --- Stubs ---

    #[derive(Default)]
    struct FaceLog {
        detect_calls: Vec<(DetectionParams, f64)>,
        cluster_thresholds: Vec<f64>,
    }

    struct StubFaceDetector {
        faces: Vec<FaceDetection>,
        fail: bool,
        log: Arc<Mutex<FaceLog>>,
    }

    impl FaceDetector for StubFaceDetector {
        fn detect(
            &self,
            _image: &ImageParams<'_>,
            params: &DetectionParams,
            angle: f64,
        ) -> Result<Vec<FaceDetection>, PortError> {
            self.log.lock().unwrap().detect_calls.push((params.clone(), angle));
            if self.fail {
                return Err("face cascade not loaded".into());
            }
            Ok(self.faces.clone())
        }

        fn cluster(
            &self,
            detections: Vec<FaceDetection>,
            overlap_threshold: f64,
        ) -> Result<Vec<FaceDetection>, PortError> {
            self.log
                .lock()
                .unwrap()
                .cluster_thresholds
                .push(overlap_threshold);
            Ok(detections)
        }
    }

    type PupilFn = Box<dyn Fn(&SeedWindow) -> Result<PupilEstimate, PortError> + Send + Sync>;

    fn pupil_fn(
        f: impl Fn(&SeedWindow) -> Result<PupilEstimate, PortError> + Send + Sync + 'static,
    ) -> PupilFn {
        Box::new(f)
    }

    struct StubPupilLocator {
        respond: PupilFn,
        calls: Arc<Mutex<Vec<(SeedWindow, f64, bool)>>>,
    }

    impl PupilLocator for StubPupilLocator {
        fn locate(
            &self,
            seed: &SeedWindow,
            _image: &ImageParams<'_>,
            angle: f64,
            flipped: bool,
        ) -> Result<PupilEstimate, PortError> {
            self.calls.lock().unwrap().push((*seed, angle, flipped));
            (self.respond)(seed)
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct LandmarkCall {
        tag: u32,
        left: PupilEstimate,
        right: PupilEstimate,
        perturb_count: u32,
        flipped: bool,
    }

    /// Answers with `row = tag`, `col = 1` (normal) or `2` (flipped).
    struct TaggedDetector {
        tag: u32,
        valid: bool,
        fail: bool,
        calls: Arc<Mutex<Vec<LandmarkCall>>>,
    }

    impl LandmarkDetector for TaggedDetector {
        fn locate(
            &self,
            left_pupil: &PupilEstimate,
            right_pupil: &PupilEstimate,
            _image: &ImageParams<'_>,
            perturb_count: u32,
            flipped: bool,
        ) -> Result<LandmarkEstimate, PortError> {
            self.calls.lock().unwrap().push(LandmarkCall {
                tag: self.tag,
                left: *left_pupil,
                right: *right_pupil,
                perturb_count,
                flipped,
            });
            if self.fail {
                return Err("landmark cascade missing".into());
            }
            if !self.valid {
                return Ok(LandmarkEstimate::not_found());
            }
            let col = if flipped { 2.0 } else { 1.0 };
            Ok(LandmarkEstimate::new(self.tag as f64, col, 4.0))
        }
    }

    struct RecordingLogger {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl PipelineLogger for RecordingLogger {
        fn progress(&mut self, current: usize, total: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("progress {current}/{total}"));
        }
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn metric(&mut self, name: &str, value: f64) {
            self.events
                .lock()
                .unwrap()
                .push(format!("metric {name} {value}"));
        }
        fn info(&mut self, _message: &str) {}
        fn image_finished(&mut self) {
            self.events.lock().unwrap().push("image".to_string());
        }
    }

    // --- Harness ---

    struct Harness {
        faces: Vec<FaceDetection>,
        face_fail: bool,
        pupil: PupilFn,
        /// `(group, tag, valid, fail)` in registration order.
        detectors: Vec<(&'static str, u32, bool, bool)>,
        config: PipelineConfig,
        face_log: Arc<Mutex<FaceLog>>,
        pupil_calls: Arc<Mutex<Vec<(SeedWindow, f64, bool)>>>,
        landmark_calls: Arc<Mutex<Vec<LandmarkCall>>>,
    }

    impl Harness {
        fn new(faces: Vec<FaceDetection>) -> Self {
            Self {
                faces,
                face_fail: false,
                pupil: pupil_fn(|seed| Ok(PupilEstimate::new(seed.row, seed.col, seed.scale, 63))),
                detectors: vec![("lp84", 84, true, false)],
                config: PipelineConfig::default(),
                face_log: Arc::default(),
                pupil_calls: Arc::default(),
                landmark_calls: Arc::default(),
            }
        }

        fn context(&self, pupil: PupilFn) -> Result<PipelineContext, PipelineError> {
            let mut catalog = LandmarkCatalog::standard();
            for &(group, tag, valid, fail) in &self.detectors {
                catalog.register(
                    group,
                    Box::new(TaggedDetector {
                        tag,
                        valid,
                        fail,
                        calls: self.landmark_calls.clone(),
                    }),
                )?;
            }
            PipelineContext::new(
                Box::new(StubFaceDetector {
                    faces: self.faces.clone(),
                    fail: self.face_fail,
                    log: self.face_log.clone(),
                }),
                Box::new(StubPupilLocator {
                    respond: pupil,
                    calls: self.pupil_calls.clone(),
                }),
                catalog,
                self.config.clone(),
            )
        }

        fn use_case(mut self) -> (DetectLandmarksUseCase, Self) {
            let pupil = std::mem::replace(
                &mut self.pupil,
                pupil_fn(|_| Ok(PupilEstimate::not_found())),
            );
            let uc = DetectLandmarksUseCase::new(self.context(pupil).unwrap());
            (uc, self)
        }
    }

    fn image() -> GrayImage {
        GrayImage::new(vec![0; 400 * 400], 400, 400).unwrap()
    }

    fn reference_face() -> FaceDetection {
        FaceDetection::new(150.0, 150.0, 100.0, 10.0)
    }

    // --- Stage 1 ---

    #[test]
    fn test_face_stage_uses_config_params_and_cluster_threshold() {
        let (mut uc, h) = Harness::new(vec![reference_face()]).use_case();
        uc.execute(&image()).unwrap();

        let log = h.face_log.lock().unwrap();
        assert_eq!(log.detect_calls.len(), 1);
        let (params, angle) = &log.detect_calls[0];
        assert_eq!(params, &DetectionParams::default());
        assert_relative_eq!(*angle, 0.0);
        assert_eq!(log.cluster_thresholds, vec![0.2]);
    }

    #[test]
    fn test_low_score_face_reported_without_pupils_or_landmarks() {
        let low = FaceDetection::new(150.0, 150.0, 100.0, 6.0);
        let (mut uc, h) = Harness::new(vec![low]).use_case();
        let results = uc.execute(&image()).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].face, low);
        assert!(!results[0].accepted);
        assert!(results[0].left_pupil.is_none());
        assert!(results[0].right_pupil.is_none());
        assert!(results[0].landmarks.is_empty());
        assert!(h.pupil_calls.lock().unwrap().is_empty());
        assert!(h.landmark_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_score_equal_to_threshold_is_rejected() {
        let edge = FaceDetection::new(150.0, 150.0, 100.0, 7.5);
        let (mut uc, h) = Harness::new(vec![edge]).use_case();
        let results = uc.execute(&image()).unwrap();
        assert!(!results[0].accepted);
        assert!(h.pupil_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_face_detector_failure_aborts_run() {
        let mut h = Harness::new(vec![reference_face()]);
        h.face_fail = true;
        let (mut uc, h) = h.use_case();
        let err = uc.execute(&image()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ClassifierUnavailable {
                port: ClassifierPort::FaceDetector,
                ..
            }
        ));
        assert!(h.pupil_calls.lock().unwrap().is_empty());
    }

    // --- Stage 2 ---

    #[test]
    fn test_reference_face_seeds() {
        let (mut uc, h) = Harness::new(vec![reference_face()]).use_case();
        uc.execute(&image()).unwrap();

        let calls = h.pupil_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        let (left, left_angle, left_flipped) = calls[0];
        let (right, _, right_flipped) = calls[1];
        assert_relative_eq!(left.row, 141.5);
        assert_relative_eq!(left.col, 131.5);
        assert_relative_eq!(left.scale, 40.0);
        assert_eq!(left.perturb_count, 63);
        assert_relative_eq!(right.row, 141.5);
        assert_relative_eq!(right.col, 168.5);
        assert_relative_eq!(right.scale, 40.0);
        assert_eq!(right.perturb_count, 63);
        assert_relative_eq!(left_angle, 0.0);
        assert!(!left_flipped && !right_flipped);
    }

    #[test]
    fn test_pupils_scan_upright_under_rotated_face_cascade() {
        let mut h = Harness::new(vec![reference_face()]);
        h.config.rotation_angle = 0.25;
        let (mut uc, h) = h.use_case();
        uc.execute(&image()).unwrap();

        assert_relative_eq!(h.face_log.lock().unwrap().detect_calls[0].1, 0.25);
        let calls = h.pupil_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|&(_, angle, _)| angle == 0.0));
    }

    #[test]
    fn test_seeds_come_from_parent_face_only() {
        let a = FaceDetection::new(100.0, 100.0, 50.0, 9.0);
        let b = FaceDetection::new(300.0, 250.0, 120.0, 12.0);
        let (mut uc, h) = Harness::new(vec![a, b]).use_case();
        uc.execute(&image()).unwrap();

        let seeds: Vec<SeedWindow> = h.pupil_calls.lock().unwrap().iter().map(|c| c.0).collect();
        assert_eq!(
            seeds,
            vec![
                derive_eye_seed(&a, EyeSide::Left),
                derive_eye_seed(&a, EyeSide::Right),
                derive_eye_seed(&b, EyeSide::Left),
                derive_eye_seed(&b, EyeSide::Right),
            ]
        );
    }

    #[test]
    fn test_invalid_pupil_excluded_but_still_seeds_landmarks() {
        let mut h = Harness::new(vec![reference_face()]);
        h.pupil = pupil_fn(|seed| {
            if seed.col < 150.0 {
                Ok(PupilEstimate::new(-1.0, 40.0, 16.0, 63))
            } else {
                Ok(PupilEstimate::new(142.0, 170.0, 16.0, 63))
            }
        });
        let (mut uc, h) = h.use_case();
        let results = uc.execute(&image()).unwrap();

        assert!(results[0].left_pupil.is_none());
        assert_eq!(results[0].right_pupil.unwrap().col, 170.0);
        assert!(!results[0].landmarks.is_empty());

        let calls = h.landmark_calls.lock().unwrap();
        assert!(calls
            .iter()
            .all(|c| c.left == PupilEstimate::new(-1.0, 40.0, 16.0, 63)));
        assert!(calls.iter().all(|c| c.right.col == 170.0));
    }

    #[test]
    fn test_pupil_locator_failure_aborts_run() {
        let mut h = Harness::new(vec![reference_face()]);
        h.pupil = pupil_fn(|_| Err("puploc cascade missing".into()));
        let (mut uc, _h) = h.use_case();
        let err = uc.execute(&image()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ClassifierUnavailable {
                port: ClassifierPort::PupilLocator,
                ..
            }
        ));
    }

    // --- Stage 3 ---

    #[test]
    fn test_landmark_order_follows_catalog_and_orientation() {
        let mut h = Harness::new(vec![reference_face()]);
        h.detectors = vec![
            ("lp81", 81, true, false),
            ("lp46", 46, true, false),
            ("lp46", 47, true, false),
            ("lp84", 84, true, false),
            ("lp84", 85, true, false),
            ("lp312", 312, true, false),
        ];
        let (mut uc, _h) = h.use_case();
        let results = uc.execute(&image()).unwrap();

        let order: Vec<(f64, f64)> = results[0].landmarks.iter().map(|p| (p.row, p.col)).collect();
        assert_eq!(
            order,
            vec![
                (46.0, 1.0),
                (46.0, 2.0),
                (47.0, 1.0),
                (47.0, 2.0),
                (312.0, 1.0),
                (312.0, 2.0),
                (84.0, 1.0),
                (84.0, 2.0),
                (85.0, 1.0),
                (85.0, 2.0),
                (81.0, 1.0),
                (81.0, 2.0),
                (84.0, 2.0),
            ]
        );
        assert!(results[0]
            .landmarks
            .iter()
            .all(|p| p.kind == PointKind::Landmark && p.score == 10.0));
    }

    #[test]
    fn test_invalid_landmarks_never_aggregated() {
        let mut h = Harness::new(vec![reference_face()]);
        h.detectors = vec![("lp46", 46, false, false), ("lp84", 84, true, false)];
        let (mut uc, h) = h.use_case();
        let results = uc.execute(&image()).unwrap();

        assert_eq!(h.landmark_calls.lock().unwrap().len(), 2 + 2 + 1);
        assert_eq!(results[0].landmarks.len(), 3);
        assert!(results[0]
            .landmarks
            .iter()
            .all(|p| p.row > 0.0 && p.col > 0.0));
    }

    #[test]
    fn test_terminal_refinement_runs_even_when_lp84_invalid() {
        let mut h = Harness::new(vec![reference_face()]);
        h.detectors = vec![("lp84", 84, false, false)];
        let (mut uc, h) = h.use_case();
        let results = uc.execute(&image()).unwrap();

        let calls = h.landmark_calls.lock().unwrap();
        let flips: Vec<bool> = calls.iter().map(|c| c.flipped).collect();
        assert_eq!(flips, vec![false, true, true]);
        assert!(results[0].landmarks.is_empty());
    }

    #[test]
    fn test_landmarks_receive_perturb_budget() {
        let (mut uc, h) = Harness::new(vec![reference_face()]).use_case();
        uc.execute(&image()).unwrap();
        assert!(h
            .landmark_calls
            .lock()
            .unwrap()
            .iter()
            .all(|c| c.perturb_count == 63));
    }

    #[test]
    fn test_landmark_failure_aborts_whole_image() {
        let mut h = Harness::new(vec![reference_face(), reference_face()]);
        h.detectors = vec![("lp84", 84, true, true)];
        let (mut uc, _h) = h.use_case();
        let err = uc.execute(&image()).unwrap_err();
        match err {
            PipelineError::ClassifierUnavailable {
                port: ClassifierPort::LandmarkDetector { group },
                ..
            } => assert_eq!(group, "lp84"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_isolate_face_policy_keeps_other_faces() {
        let good = FaceDetection::new(100.0, 100.0, 50.0, 9.0);
        let bad = FaceDetection::new(300.0, 300.0, 80.0, 11.0);
        let mut h = Harness::new(vec![good, bad]);
        h.pupil = pupil_fn(|seed| {
            if seed.row > 200.0 {
                Err("scratch buffer exhausted".into())
            } else {
                Ok(PupilEstimate::new(seed.row, seed.col, seed.scale, 63))
            }
        });
        let (uc, _h) = h.use_case();
        let mut uc = uc.with_failure_policy(FailurePolicy::IsolateFace);
        let results = uc.execute(&image()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].face, good);
    }

    #[test]
    fn test_isolated_failure_still_counts_image() {
        let good = FaceDetection::new(100.0, 100.0, 50.0, 9.0);
        let bad = FaceDetection::new(300.0, 300.0, 80.0, 11.0);
        let mut h = Harness::new(vec![good, bad]);
        h.pupil = pupil_fn(|seed| {
            if seed.row > 200.0 {
                Err("scratch buffer exhausted".into())
            } else {
                Ok(PupilEstimate::new(seed.row, seed.col, seed.scale, 63))
            }
        });
        let events = Arc::new(Mutex::new(Vec::new()));
        let (uc, _h) = h.use_case();
        let mut uc = uc
            .with_failure_policy(FailurePolicy::IsolateFace)
            .with_logger(Box::new(RecordingLogger {
                events: events.clone(),
            }));
        uc.execute(&image()).unwrap();
        uc.execute(&image()).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            events.iter().filter(|e| e.as_str() == "progress 1/2").count(),
            2
        );
        assert_eq!(events.iter().filter(|e| e.as_str() == "image").count(), 2);
        assert!(events.contains(&"metric faces_accepted 2".to_string()));
    }

    // --- Whole run ---

    #[test]
    fn test_running_twice_is_identical() {
        let faces = vec![
            reference_face(),
            FaceDetection::new(300.0, 220.0, 90.0, 6.0),
            FaceDetection::new(80.0, 320.0, 60.0, 8.0),
        ];
        let mut h = Harness::new(faces);
        h.detectors = vec![("lp46", 46, true, false), ("lp84", 84, true, false)];
        let (mut uc, _h) = h.use_case();
        let first = uc.execute(&image()).unwrap();
        let second = uc.execute(&image()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_threaded_executor_matches_sequential() {
        let faces: Vec<FaceDetection> = (0..9)
            .map(|i| FaceDetection::new(60.0 + 30.0 * i as f64, 200.0, 50.0, 5.0 + i as f64))
            .collect();
        let detectors = vec![
            ("lp46", 46, true, false),
            ("lp93", 93, true, false),
            ("lp84", 84, true, false),
        ];

        let mut h = Harness::new(faces.clone());
        h.detectors = detectors.clone();
        let (mut sequential, _h) = h.use_case();

        let mut h = Harness::new(faces);
        h.detectors = detectors;
        let (threaded, _h) = h.use_case();
        let mut threaded =
            threaded.with_executor(Box::new(ThreadedFaceExecutor::new(4).unwrap()));

        assert_eq!(
            sequential.execute(&image()).unwrap(),
            threaded.execute(&image()).unwrap()
        );
    }

    #[test]
    fn test_missing_terminal_detector_fails_before_any_stage() {
        let mut h = Harness::new(vec![reference_face()]);
        h.detectors = vec![("lp46", 46, true, false)];
        let pupil = pupil_fn(|_| Ok(PupilEstimate::not_found()));
        let result = h.context(pupil);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
        assert!(h.face_log.lock().unwrap().detect_calls.is_empty());
    }

    #[test]
    fn test_invalid_config_fails_at_construction() {
        let mut h = Harness::new(vec![reference_face()]);
        h.config.detection.min_size = 2000;
        let pupil = pupil_fn(|_| Ok(PupilEstimate::not_found()));
        assert!(matches!(
            h.context(pupil),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn test_no_faces_yields_empty_result() {
        let (mut uc, h) = Harness::new(vec![]).use_case();
        assert!(uc.execute(&image()).unwrap().is_empty());
        assert!(h.pupil_calls.lock().unwrap().is_empty());
    }
}
