use std::thread;
use std::time::Duration;

use blob::{
    derive_gradients, BlobConfig, BlobError, BlobRenderer, BlobState, ColorVariations,
    ContourGenerator, FacePosition, NoiseField, Point, Presentation, PresenceDetector,
    PresenceEvent, RecordingCanvas, Rgba, ShadingConfig, TimeAccumulators,
};

fn active() -> BlobRenderer {
    BlobRenderer::for_presentation(Presentation::Active).unwrap()
}

#[test]
fn fresh_idle_blob_sits_at_the_surface_center() {
    let renderer = active();
    let ctx = renderer.new_context();
    assert_eq!(ctx.state(), BlobState::Idle);
    assert_eq!(ctx.state().base_color(), Rgba::rgb(10, 10, 15));

    let contour = renderer.contour(&ctx, 400.0, 300.0);
    assert_eq!(contour.len(), 40);

    // Radial noise mostly cancels out around the ring.
    let centroid = contour.centroid();
    let drift = centroid.distance(Point::new(200.0, 150.0));
    assert!(drift < 10.0, "{centroid:?}");
}

#[test]
fn listening_palette_clamps_the_highlight() {
    assert_eq!(BlobState::Listening.base_color(), Rgba::rgb(0, 200, 255));
    let palette = ColorVariations::for_state(BlobState::Listening);
    assert_eq!(palette.highlight, Rgba::rgb(80, 255, 255));
    assert_eq!(palette.shadow, Rgba::rgb(0, 140, 195));
}

#[test]
fn success_runs_its_course_and_settles_to_idle() {
    let renderer = active();
    let mut ctx = renderer.new_context();
    ctx.request_state(BlobState::Success);
    for _ in 0..51 {
        renderer.tick(&mut ctx);
    }
    assert_eq!(ctx.state(), BlobState::Idle);
    assert_eq!(ctx.clock().state_timer(), 0);
    assert_eq!(ctx.clock().center_offset(), [0.0, 0.0]);
}

#[test]
fn error_interrupted_by_a_new_request() {
    let renderer = active();
    let mut ctx = renderer.new_context();
    ctx.request_state(BlobState::Error);
    for _ in 0..10 {
        renderer.tick(&mut ctx);
    }
    ctx.request_state_named("thinking");
    for _ in 0..100 {
        renderer.tick(&mut ctx);
    }
    assert_eq!(ctx.state(), BlobState::Thinking);
}

#[test]
fn contour_is_closed_for_any_point_count() {
    let noise = NoiseField::default();
    let mut phases = TimeAccumulators::default();
    for num_points in [3, 8, 40, 128] {
        let mut config = BlobConfig::default().contour;
        config.num_points = num_points;
        let generator = ContourGenerator::new(config).unwrap();
        phases.advance([0.03, 0.05, 0.08]);
        let contour = generator.generate(
            &noise,
            Point::new(200.0, 150.0),
            &phases,
            FacePosition::new(0.9, 0.1),
            [0.0, 0.0],
        );
        assert_eq!(contour.len(), num_points);
        assert!(contour.to_path().is_closed());
        assert!(contour.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

#[test]
fn gradients_are_well_formed_for_every_state() {
    let renderer = active();
    let ctx = renderer.new_context();
    let contour = renderer.contour(&ctx, 400.0, 300.0);
    let centroid = contour.centroid();
    let reach = contour.max_distance_from(centroid);
    for state in BlobState::ALL {
        let base = state.base_color();
        let shading = ShadingConfig::default();
        let gradients = derive_gradients(base, centroid, reach, [0.2, -0.1], &shading);
        for spec in gradients.in_paint_order() {
            spec.validate().unwrap();
        }
    }
}

#[test]
fn a_frame_is_body_then_two_eyes() {
    let renderer = active();
    let mut ctx = renderer.new_context();
    let mut canvas = RecordingCanvas::new();
    renderer.tick(&mut ctx);
    let elapsed = Duration::from_millis(1_200);
    let summary = renderer
        .paint_at(&mut ctx, &mut canvas, 400.0, 300.0, elapsed)
        .unwrap();
    assert_eq!(canvas.ops().len(), 8);
    assert_eq!(&canvas.layer_names()[6..], ["solid", "solid"]);
    assert!(summary.eyes.left.center.x < summary.eyes.right.center.x);

    let json = canvas.to_json().unwrap();
    assert!(json.contains("secondary_highlight"));
}

#[test]
fn surface_size_is_checked_per_frame() {
    let renderer = active();
    let mut ctx = renderer.new_context();
    let mut canvas = RecordingCanvas::new();
    let err = renderer
        .paint_at(&mut ctx, &mut canvas, 0.0, 0.0, Duration::ZERO)
        .unwrap_err();
    assert!(matches!(err, BlobError::InvalidSurface { .. }));
}

#[test]
fn ambient_preset_renders_a_smaller_blob() {
    let renderer = BlobRenderer::for_presentation(Presentation::Ambient).unwrap();
    let (w, h) = Presentation::Ambient.surface_size();
    let mut ctx = renderer.new_context();
    let summary = renderer
        .paint_at(&mut ctx, &mut RecordingCanvas::new(), w, h, Duration::ZERO)
        .unwrap();
    assert_eq!(summary.contour.len(), 30);
    assert!(summary.contour.max_distance_from(Point::new(75.0, 75.0)) < 75.0 + 30.0);
}

#[test]
fn config_survives_a_json_round_trip() {
    let mut config = BlobConfig::for_presentation(Presentation::Ambient);
    config.noise_seed = 7;
    config.eyes.rotation_deg = 35.0;
    let parsed = BlobConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(parsed, config);

    let renderer = BlobRenderer::new(parsed).unwrap();
    assert_eq!(renderer.noise().seed(), 7);
}

#[test]
fn face_tracker_thread_feeds_the_frame_loop() {
    let renderer = active();
    let mut ctx = renderer.new_context();
    let face = ctx.face_handle();

    let producer = thread::spawn(move || {
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            face.update(t, 1.0 - t);
        }
    });
    producer.join().unwrap();

    let mut detector = PresenceDetector::new();
    for visible in [false, true, true] {
        if let Some(event) = detector.observe(visible) {
            assert_eq!(event, PresenceEvent::Gained);
            ctx.handle_presence(event);
        }
    }
    assert_eq!(ctx.state(), BlobState::Listening);

    renderer.tick(&mut ctx);
    let mut canvas = RecordingCanvas::new();
    let summary = renderer
        .paint_at(&mut ctx, &mut canvas, 400.0, 300.0, Duration::ZERO)
        .unwrap();
    assert_eq!(summary.face, FacePosition::new(1.0, 0.0));

    if let Some(event) = detector.observe(false) {
        ctx.handle_presence(event);
    }
    assert_eq!(ctx.state(), BlobState::Idle);
}
