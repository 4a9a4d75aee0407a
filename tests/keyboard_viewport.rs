use crux_core::testing::AppTester;

use account_core::capabilities::{TimerId, TimerOperation, TimerOutput, ViewportOperation};
use account_core::model::DeviceClass;
use account_core::{App, Effect, Event, Model};

fn tester() -> AppTester<App, Effect> {
    AppTester::default()
}

fn present(app: &AppTester<App, Effect>, model: &mut Model, device_class: DeviceClass) {
    let _ = app.update(
        Event::ScreenPresented {
            device_class,
            closable: false,
            app_version: "4.2.0".into(),
            prior_session: None,
        },
        model,
    );
}

fn timer_starts(effects: &[Effect]) -> Vec<(TimerId, u64)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Timer(request) => match &request.operation {
                TimerOperation::Start { id, millis } => Some((id.clone(), *millis)),
                TimerOperation::Cancel { .. } => None,
            },
            _ => None,
        })
        .collect()
}

fn timer_cancels(effects: &[Effect]) -> Vec<TimerId> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Timer(request) => match &request.operation {
                TimerOperation::Cancel { id } => Some(id.clone()),
                TimerOperation::Start { .. } => None,
            },
            _ => None,
        })
        .collect()
}

fn scrolls(effects: &[Effect]) -> Vec<(f64, u64)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Viewport(request) => match &request.operation {
                ViewportOperation::ScrollTo { y, duration_ms } => Some((*y, *duration_ms)),
            },
            _ => None,
        })
        .collect()
}

fn elapsed(id: TimerId) -> Event {
    Event::ViewportTimerFired {
        id,
        output: TimerOutput::Elapsed,
    }
}

#[test]
fn keyboard_show_records_height_and_defers_the_scroll() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );

    assert!((model.viewport.keyboard_height - 300.0).abs() < f64::EPSILON);
    // No scroll yet; a zero-delay settle timer is scheduled first.
    assert!(scrolls(&update.effects).is_empty());
    let starts = timer_starts(&update.effects);
    assert_eq!(starts.len(), 1);
    let (settle_id, settle_ms) = starts[0].clone();
    assert_eq!(settle_ms, 0);

    let update = app.update(elapsed(settle_id), &mut model);
    // Phone banner 24 + title margin 35 + card margin 40.
    assert_eq!(scrolls(&update.effects), vec![(99.0, 250)]);
}

#[test]
fn tablet_banner_raises_the_scroll_offset() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Tablet);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 320.0,
            duration_ms: 200,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();

    let update = app.update(elapsed(settle_id), &mut model);
    assert_eq!(scrolls(&update.effects), vec![(123.0, 200)]);
}

#[test]
fn keyboard_hide_scrolls_back_immediately_and_clears_height_later() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();
    let _ = app.update(elapsed(settle_id), &mut model);

    let update = app.update(Event::KeyboardWillHide { duration_ms: 180 }, &mut model);

    // Scroll-back is immediate; the height reset waits for the animation.
    assert_eq!(scrolls(&update.effects), vec![(0.0, 180)]);
    assert!((model.viewport.keyboard_height - 300.0).abs() < f64::EPSILON);
    let starts = timer_starts(&update.effects);
    assert_eq!(starts.len(), 1);
    let (clear_id, clear_ms) = starts[0].clone();
    assert_eq!(clear_ms, 180);

    let _ = app.update(elapsed(clear_id), &mut model);
    assert!(model.viewport.keyboard_height.abs() < f64::EPSILON);
    assert!(model.viewport.pending_clear.is_none());
}

#[test]
fn hide_before_the_settle_fires_suppresses_the_deferred_scroll() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();

    let update = app.update(Event::KeyboardWillHide { duration_ms: 180 }, &mut model);
    // The pending settle is cancelled and only the scroll-back happens.
    assert_eq!(timer_cancels(&update.effects), vec![settle_id.clone()]);
    assert_eq!(scrolls(&update.effects), vec![(0.0, 180)]);
    let (clear_id, _) = timer_starts(&update.effects)[0].clone();

    // The stale settle firing anyway must not scroll.
    let update = app.update(elapsed(settle_id), &mut model);
    assert!(scrolls(&update.effects).is_empty());

    // And the height still clears once the hide delay elapses.
    let _ = app.update(elapsed(clear_id), &mut model);
    assert!(model.viewport.keyboard_height.abs() < f64::EPSILON);
}

#[test]
fn show_after_hide_keeps_the_new_height() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();
    let _ = app.update(elapsed(settle_id), &mut model);

    let update = app.update(Event::KeyboardWillHide { duration_ms: 180 }, &mut model);
    let (stale_clear_id, _) = timer_starts(&update.effects)[0].clone();

    // The keyboard comes back before the hide's reset fires.
    let update = app.update(
        Event::KeyboardWillShow {
            height: 320.0,
            duration_ms: 250,
        },
        &mut model,
    );
    assert_eq!(timer_cancels(&update.effects), vec![stale_clear_id.clone()]);
    assert!((model.viewport.keyboard_height - 320.0).abs() < f64::EPSILON);

    // The superseded reset firing anyway must not zero the new height.
    let _ = app.update(elapsed(stale_clear_id), &mut model);
    assert!((model.viewport.keyboard_height - 320.0).abs() < f64::EPSILON);
}

#[test]
fn cancelled_timers_do_not_complete_their_tasks() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();

    let update = app.update(
        Event::ViewportTimerFired {
            id: settle_id,
            output: TimerOutput::Cancelled,
        },
        &mut model,
    );
    assert!(scrolls(&update.effects).is_empty());
}

#[test]
fn unmount_cancels_every_pending_timer() {
    let app = tester();
    let mut model = Model::default();
    present(&app, &mut model, DeviceClass::Phone);

    let update = app.update(
        Event::KeyboardWillShow {
            height: 300.0,
            duration_ms: 250,
        },
        &mut model,
    );
    let (settle_id, _) = timer_starts(&update.effects)[0].clone();

    let update = app.update(Event::ScreenUnmounted, &mut model);

    assert_eq!(timer_cancels(&update.effects), vec![settle_id]);
    assert!(model.viewport.pending_scroll.is_none());
    assert!(model.viewport.pending_clear.is_none());
    assert!(model.viewport.keyboard_height.abs() < f64::EPSILON);
}
