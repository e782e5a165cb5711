//! Integration tests for Videobox Core

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::LocalSet;
use videobox_core::{
    geometry::{circular_index, clip, fit_width},
    headless::{HeadlessDocument, HeadlessSurface},
    Button, ButtonConfig, ChildItem, Origin, Pagination, PaginationConfig, Part, Phase,
    PlayerKind, Rect, Slider, SliderConfig, TokioScheduler, Videobox, VideoboxConfig, View,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("videobox_core=debug")
        .with_test_writer()
        .try_init();
}

fn document(viewport: Rect) -> (Videobox, Rc<HeadlessDocument>) {
    init_tracing();
    let scheduler = Rc::new(TokioScheduler);
    let doc = Rc::new(HeadlessDocument::new(scheduler.clone(), viewport));
    let ctx = Videobox::new(VideoboxConfig::default(), scheduler, doc.clone());
    (ctx, doc)
}

// =============================================================================
// Player Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_show_settles_with_fitted_width() {
    LocalSet::new()
        .run_until(async {
            let origins = [
                Origin::point(0.0, 0.0),
                Origin::from_rect(Rect::new(10.0, 20.0, 320.0, 180.0)),
                Origin {
                    x: None,
                    y: Some(400.0),
                    w: None,
                    h: Some(90.0),
                },
            ];
            let viewports = [
                Rect::new(0.0, 0.0, 1920.0, 1080.0),
                Rect::new(0.0, 0.0, 800.0, 400.0),
                Rect::new(0.0, 0.0, 375.0, 667.0),
            ];

            for viewport in viewports {
                for origin in origins {
                    let (ctx, _doc) = document(viewport);
                    let overlay = ctx.overlay();
                    overlay.set_max_size(Some(1280.0), Some(720.0)).await;

                    overlay.show(Some(origin)).await;

                    assert!(overlay.is_open());
                    assert_eq!(overlay.phase(), Phase::Open);
                    assert_eq!(
                        overlay.width(),
                        Some(fit_width(1280.0, 720.0, viewport, 90.0))
                    );
                    ctx.teardown();
                }
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_hide_on_closed_player_is_noop() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let overlay = ctx.overlay();
            let surface = doc.created(PlayerKind::Overlay)[0].clone();
            let commits = surface.commits();

            overlay.hide().await;
            overlay.hide_with(true).await;

            assert_eq!(surface.commits(), commits);
            assert!(surface.animations().is_empty());
            assert_eq!(overlay.phase(), Phase::Closed);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_second_show_does_not_animate() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let overlay = ctx.overlay();
            let origin = Some(Origin::point(200.0, 300.0));

            overlay.show(origin).await;
            let animations = doc.created(PlayerKind::Overlay)[0].animations().len();
            overlay.show(origin).await;

            assert_eq!(
                doc.created(PlayerKind::Overlay)[0].animations().len(),
                animations
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_reopen_while_closing() {
    LocalSet::new()
        .run_until(async {
            let (ctx, _doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let overlay = ctx.overlay();
            overlay.show(Some(Origin::point(0.0, 0.0))).await;

            let closing = overlay.clone();
            let hide = tokio::task::spawn_local(async move { closing.hide().await });
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(overlay.phase(), Phase::Closing);

            overlay.show(None).await;
            hide.await.unwrap();

            assert!(overlay.is_open());
            assert_eq!(overlay.phase(), Phase::Open);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_resize_while_open_refits_width() {
    LocalSet::new()
        .run_until(async {
            let viewport = Rect::new(0.0, 0.0, 1920.0, 1080.0);
            let (ctx, doc) = document(viewport);
            let overlay = ctx.overlay();
            overlay.set_max_size(Some(1280.0), Some(720.0)).await;
            overlay.show(None).await;
            assert_eq!(overlay.width(), Some(1280.0));

            let smaller = Rect::new(0.0, 0.0, 800.0, 400.0);
            doc.created(PlayerKind::Overlay)[0].set_rect(Part::Host, smaller);
            overlay.resized().await;
            let fitted = fit_width(1280.0, 720.0, smaller, 90.0);
            assert_eq!(overlay.width(), Some(fitted));
            assert!(fitted < 1280.0);

            overlay.set_max_size(Some(320.0), Some(180.0)).await;
            assert_eq!(overlay.width(), Some(320.0));
            match doc.created(PlayerKind::Overlay)[0].view() {
                Some(View::Player(v)) => assert_eq!(v.width, Some(320.0)),
                other => panic!("unexpected view: {:?}", other),
            }
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_resize_while_closed_defers_to_next_show() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1920.0, 1080.0));
            let overlay = ctx.overlay();
            overlay.set_max_size(Some(1280.0), Some(720.0)).await;
            overlay.show(None).await;
            overlay.hide().await;

            let smaller = Rect::new(0.0, 0.0, 800.0, 400.0);
            doc.created(PlayerKind::Overlay)[0].set_rect(Part::Host, smaller);
            overlay.resized().await;
            assert_eq!(overlay.width(), Some(1280.0));

            overlay.show(None).await;
            assert_eq!(overlay.width(), Some(fit_width(1280.0, 720.0, smaller, 90.0)));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_interrupted_close_still_closes() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let overlay = ctx.overlay();
            overlay.show(Some(Origin::point(0.0, 0.0))).await;

            let closing = overlay.clone();
            let hide = tokio::task::spawn_local(async move { closing.hide().await });
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(overlay.phase(), Phase::Closing);

            let surface = &doc.created(PlayerKind::Overlay)[0];
            surface.interrupt(Part::Wrap);
            surface.interrupt(Part::Background);
            hide.await.unwrap();

            assert!(!overlay.is_open());
            assert_eq!(overlay.phase(), Phase::Closed);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_phase_broadcast() {
    LocalSet::new()
        .run_until(async {
            let (ctx, _doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let overlay = ctx.overlay();
            let mut phases = overlay.subscribe_phase();
            assert_eq!(*phases.borrow(), Phase::Closed);

            overlay.show(None).await;
            assert!(phases.has_changed().unwrap());
            assert_eq!(*phases.borrow_and_update(), Phase::Open);

            overlay.hide().await;
            assert_eq!(*phases.borrow_and_update(), Phase::Closed);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_opening_overlay_hides_inline_first() {
    LocalSet::new()
        .run_until(async {
            let (ctx, _doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let inline = ctx.create_inline();
            inline.show(Some(Origin::point(5.0, 5.0))).await;
            assert!(inline.is_open());

            let overlay = ctx.overlay();
            let order = Rc::new(RefCell::new(Vec::new()));
            {
                let order = order.clone();
                inline.on_open_change(move |open| order.borrow_mut().push(("inline", open)));
            }
            {
                let order = order.clone();
                let inline = inline.clone();
                overlay.on_open_change(move |open| {
                    order.borrow_mut().push(("overlay", open));
                    assert_ne!(inline.phase(), Phase::Open);
                });
            }

            let mut show = tokio_test::task::spawn(overlay.show(None));
            assert!(show.poll().is_pending());
            assert_eq!(inline.phase(), Phase::Closing);
            assert!(overlay.is_open());
            drop(show);

            tokio::time::sleep(Duration::from_secs(3)).await;
            assert!(!inline.is_open());
            assert_eq!(
                order.borrow().as_slice(),
                &[("overlay", true), ("inline", false)]
            );
        })
        .await;
}

#[test]
fn test_clip_degrades_gracefully() {
    assert_eq!(clip(Some(-1.0), 720.0), 720.0);
    assert_eq!(clip(Some(f64::NAN), 405.0), 405.0);
    assert_eq!(clip(None, 240.0), 240.0);
    assert_eq!(clip(Some(12.5), 240.0), 12.5);
}

// =============================================================================
// Slider Tests
// =============================================================================

async fn slider(ctx: &Videobox, doc: &HeadlessDocument, config: SliderConfig) -> (Slider, Rc<HeadlessSurface>) {
    let surface = doc.surface(Rect::new(0.0, 0.0, 720.0, 240.0));
    let slider = Slider::new(ctx, surface.clone(), config);
    slider.mount().await;
    slider
        .set_items((0..10).map(|_| ChildItem::new()).collect())
        .await;
    (slider, surface)
}

#[tokio::test(start_paused = true)]
async fn test_slider_three_nexts_one_cycle() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let (slider, surface) = slider(
                &ctx,
                &doc,
                SliderConfig {
                    single: true,
                    ..SliderConfig::default()
                },
            )
            .await;
            assert_eq!((slider.total(), slider.active(), slider.start()), (10, 3, 0));

            let first = slider.next();
            let second = slider.next();
            let third = slider.next();
            tokio::join!(first, second, third);

            assert_eq!(slider.start(), 3);
            assert_eq!(surface.animations_on(Part::Content).len(), 1);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_slider_moves_pending_during_slide_run_next_cycle() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let (slider, surface) = slider(&ctx, &doc, SliderConfig::default()).await;

            let first = slider.clone();
            let first = tokio::task::spawn_local(async move { first.next().await });
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert_eq!(slider.moving(), 3);

            slider.prev().await;
            first.await.unwrap();

            assert_eq!(slider.start(), 0);
            assert_eq!(slider.moving(), 0);
            assert_eq!(surface.animations_on(Part::Content).len(), 2);
        })
        .await;
}

#[test]
fn test_circular_index_is_periodic() {
    for total in 1..12usize {
        for start in -20..20i64 {
            let base = circular_index(start, total);
            assert!(base < total);
            for k in -4..4i64 {
                assert_eq!(circular_index(start + k * total as i64, total), base);
            }
        }
    }
}

// =============================================================================
// Pagination Tests
// =============================================================================

#[tokio::test]
async fn test_pagination_clamps_page() {
    let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
    let surface = doc.surface(Rect::new(0.0, 0.0, 960.0, 600.0));
    let pagination = Pagination::new(
        &ctx,
        surface,
        PaginationConfig {
            per_page: Some(12.0),
            ..PaginationConfig::default()
        },
    );
    pagination.mount().await;
    pagination
        .set_items((0..25).map(|_| ChildItem::new()).collect())
        .await;

    assert_eq!(pagination.page_count(), 3);
    pagination.set_page(5).await;
    assert_eq!(pagination.page(), 2);
}

// =============================================================================
// Button Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_buttons_keep_one_player_open() {
    LocalSet::new()
        .run_until(async {
            let (ctx, doc) = document(Rect::new(0.0, 0.0, 1280.0, 800.0));
            let config = ButtonConfig::from_attributes([
                ("player", "vbinline"),
                ("src", "https://example.com/embed/a"),
                ("max-width", "640px"),
            ]);
            let a = Button::new(&ctx, doc.surface(Rect::new(0.0, 0.0, 320.0, 180.0)), config);
            let b = Button::new(
                &ctx,
                doc.surface(Rect::new(0.0, 200.0, 320.0, 180.0)),
                ButtonConfig::from_attributes([("player", "vbinline")]),
            );

            a.open_player().await;
            b.open_player().await;
            tokio::time::sleep(Duration::from_secs(3)).await;

            let open: Vec<_> = ctx
                .registry()
                .instances(PlayerKind::Inline)
                .into_iter()
                .filter(|p| p.is_open())
                .map(|p| p.id())
                .collect();
            assert_eq!(open, vec![b.inline_player().map(|p| p.id()).unwrap()]);

            let a_player = a.inline_player().unwrap();
            assert_eq!(a_player.config().max_width, Some(640.0));
            assert!(matches!(a.view(), View::Button(v) if v.slot == videobox_core::view::ButtonSlot::Trigger));
        })
        .await;
}

#[test]
fn test_config_from_json() {
    let config = VideoboxConfig::from_json(r#"{"debounce_ms": 50, "embedded_policy": "skip_aspect_ratio"}"#)
        .unwrap();
    assert_eq!(config.debounce_window(), Duration::from_millis(50));
    assert_eq!(config.embedded_policy, videobox_core::EmbeddedPolicy::SkipAspectRatio);
    assert_eq!(config.default_width, 720.0);
}
