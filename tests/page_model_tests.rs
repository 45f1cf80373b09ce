//! Model-level walkthrough of a full visit: loading delay, section reveals,
//! form entry and the exit sequence, with no window or GPU involved.

use std::time::{Duration, Instant};

use savepoint::config::ThemeConfig;
use savepoint::contact::ContactForm;
use savepoint::content::{Section, PAGE};
use savepoint::lifecycle::{Lifecycle, PagePhase, RevealTracker, Scroll};
use savepoint::page::{compose_scene, PageView, ThemePalette};
use savepoint::retro_tv::{RetroTv, TvPhase, TOTAL};

fn palette() -> ThemePalette {
    ThemePalette::from_config(&ThemeConfig::default())
}

fn scene_contains(scene: &savepoint::page::Scene, needle: &str) -> bool {
    scene.texts.iter().any(|item| {
        item.spans
            .iter()
            .map(|s| s.text.as_str())
            .collect::<String>()
            .contains(needle)
    })
}

#[test]
fn page_mounts_after_the_loading_delay() {
    let start = Instant::now();
    let mut lifecycle = Lifecycle::new(Duration::from_secs(1), start);
    assert_eq!(lifecycle.phase(), PagePhase::Loading);

    assert!(!lifecycle.tick(start + Duration::from_millis(500)));
    assert_eq!(lifecycle.phase(), PagePhase::Loading);

    assert!(lifecycle.tick(start + Duration::from_millis(1001)));
    assert_eq!(lifecycle.phase(), PagePhase::Loaded);
    // The transition edge fires exactly once.
    assert!(!lifecycle.tick(start + Duration::from_secs(2)));
}

#[test]
fn loading_screen_swaps_for_the_full_page() {
    let pal = palette();
    let loading = PageView {
        phase: PagePhase::Loading,
        scroll_vh: 0.0,
        reveal: [1.0; 3],
        form: None,
        tv: TvPhase::Idle,
        error: None,
    };
    let scene = compose_scene(&loading, &pal, 1920.0, 1080.0);
    assert!(scene_contains(&scene, PAGE.loading));
    assert!(!scene_contains(&scene, PAGE.hero_title));

    let loaded = PageView {
        phase: PagePhase::Loaded,
        ..loading
    };
    let scene = compose_scene(&loaded, &pal, 1920.0, 1080.0);
    assert!(!scene_contains(&scene, PAGE.loading));
    assert!(scene_contains(&scene, PAGE.hero_title));
    for feature in &PAGE.features {
        assert!(scene_contains(&scene, feature.icon));
    }
    assert!(scene_contains(&scene, PAGE.footer));
}

#[test]
fn sections_reveal_once_and_stay_revealed() {
    let start = Instant::now();
    let fade = Duration::from_millis(800);
    let mut reveal = RevealTracker::new();
    let mut scroll = Scroll::new();

    reveal.observe(Section::Hero, scroll.section_in_view(Section::Hero), start);
    assert!(reveal.has_revealed(Section::Hero));
    assert!(!reveal.has_revealed(Section::Features));

    // Scroll the features into view.
    scroll.scroll_by(1.0);
    let later = start + Duration::from_secs(2);
    for section in Section::ALL {
        reveal.observe(section, scroll.section_in_view(section), later);
    }
    assert!(reveal.has_revealed(Section::Features));

    // Scrolling back up does not reset the reveal.
    scroll.scroll_by(-1.0);
    let done = later + fade;
    for section in Section::ALL {
        reveal.observe(section, scroll.section_in_view(section), done);
    }
    assert!(reveal.has_revealed(Section::Features));
    assert!((reveal.progress(Section::Features, done, fade) - 1.0).abs() < 1e-6);
}

#[test]
fn exit_sequence_plays_once_and_restores_the_page() {
    let start = Instant::now();
    let mut tv = RetroTv::new();
    let mut scroll = Scroll::new();

    tv.trigger(start);
    scroll.set_locked(tv.is_active());
    assert!(scroll.is_locked());
    let before = scroll.offset_vh();
    scroll.scroll_by(0.5);
    assert_eq!(scroll.offset_vh(), before);

    // Retriggering mid-run must not extend the sequence.
    tv.trigger(start + Duration::from_secs(3));

    assert!(!tv.tick(start + Duration::from_secs(3)));
    assert!(tv.tick(start + TOTAL + Duration::from_millis(1)));
    // Exactly one completion edge.
    assert!(!tv.tick(start + TOTAL + Duration::from_secs(1)));

    scroll.set_locked(tv.is_active());
    assert!(!scroll.is_locked());
    assert!(matches!(
        tv.phase(start + TOTAL + Duration::from_secs(1)),
        TvPhase::Idle
    ));
}

#[test]
fn collapse_reaches_black_before_the_message() {
    let start = Instant::now();
    let mut tv = RetroTv::new();
    tv.trigger(start);

    match tv.phase(start + Duration::from_millis(250)) {
        TvPhase::FlashCollapse {
            scale_y, darkness, ..
        } => {
            assert!(scale_y < 1.0);
            assert!(darkness < 1.0);
        }
        other => panic!("expected collapse, got {other:?}"),
    }
    match tv.phase(start + Duration::from_millis(1500)) {
        TvPhase::MessageVisible { text_alpha } => assert!(text_alpha > 0.9),
        other => panic!("expected message, got {other:?}"),
    }

    let scene = compose_scene(
        &PageView {
            phase: PagePhase::Loaded,
            scroll_vh: 0.0,
            reveal: [1.0; 3],
            form: None,
            tv: tv.phase(start + Duration::from_millis(1500)),
            error: None,
        },
        &palette(),
        1920.0,
        1080.0,
    );
    assert!(scene_contains(&scene, PAGE.thank_you_title));
}

#[test]
fn form_gates_submission_on_required_fields() {
    let mut form = ContactForm::new();
    assert!(!form.can_submit());

    form.insert("Ada Lovelace");
    form.focus_next();
    form.insert("ada@example.com");
    form.focus_next();
    // Company stays optional.
    form.focus_next();
    form.insert("Hello from the kiosk");
    assert!(form.can_submit());

    form.set_submitting(true);
    assert!(!form.can_submit());

    form.reset();
    assert!(form.name.is_empty());
    assert!(form.message.is_empty());
    assert!(!form.is_submitting());
}
