use std::sync::Arc;
use std::thread;

use frameinput::backends::virtual_input::{
    CursorCall, ScriptedEvent, ScriptedSource, VirtualCursor, VirtualGamepads,
};
use frameinput::{
    apply_stick_dead_zone, ButtonState, DeadZone, DeviceId, GamepadButton, GamepadManager,
    GamepadState, Input, InputConfig, InputError, Key, KeyboardState, KeyboardStateTracker,
    MouseEvent, MouseMode, NullCursor, PlayerIndex, TouchPhase, Vibration, WindowHandle,
    THUMB_DEAD_ZONE,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn headless_input(pads: &VirtualGamepads) -> Input<VirtualGamepads> {
    Input::new(&InputConfig::default(), pads.clone(), NullCursor::default())
        .expect("default config is valid")
}

#[test]
fn dead_zone_boundaries() {
    let t = THUMB_DEAD_ZONE - 1e-4;
    assert_eq!(
        apply_stick_dead_zone(t, t, DeadZone::IndependentAxis, 1.0, THUMB_DEAD_ZONE),
        (0.0, 0.0)
    );
    let (x, y) = apply_stick_dead_zone(1.0, 1.0, DeadZone::IndependentAxis, 1.0, THUMB_DEAD_ZONE);
    assert!((x - 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5);
    assert_eq!(
        apply_stick_dead_zone(0.3, -0.7, DeadZone::None, 1.0, THUMB_DEAD_ZONE),
        (0.3, -0.7)
    );
}

#[test]
fn key_edges_across_updates() {
    let mut tracker = KeyboardStateTracker::new();
    let mut held = KeyboardState::default();
    held.set(Key::A);
    let empty = KeyboardState::default();

    let mut seen = Vec::new();
    for sample in [false, true, true, false] {
        tracker.update(if sample { &held } else { &empty });
        seen.push(tracker.key_state(Key::A));
    }
    assert_eq!(
        seen,
        vec![
            ButtonState::Up,
            ButtonState::Pressed,
            ButtonState::Held,
            ButtonState::Released
        ]
    );
}

#[test]
fn get_key_sequence_for_held_letter() {
    init_logging();
    let pads = VirtualGamepads::new(4);
    let source = ScriptedSource::new();
    let mut input = headless_input(&pads).with_source(source.clone());

    let mut a_down = KeyboardState::default();
    a_down.set(Key::A);
    source.hold_keyboard(a_down, 3);
    source.push_frame([ScriptedEvent::Keyboard(KeyboardState::default())]);

    let mut frames = Vec::new();
    for _ in 0..4 {
        input.update().unwrap();
        frames.push((
            input.get_key_down("a"),
            input.get_key("a"),
            input.get_key_up("a"),
        ));
        input.end_frame();
    }
    assert_eq!(
        frames,
        vec![
            (true, true, false),
            (false, true, false),
            (false, true, false),
            (false, false, true),
        ]
    );
}

#[test]
fn relative_mode_round_trip_through_facade() {
    let pads = VirtualGamepads::new(4);
    let cursor = VirtualCursor::new();
    let mut input = Input::new(&InputConfig::default(), pads, cursor.clone()).unwrap();
    input.mouse().set_window(WindowHandle(42));
    input.mouse().process(MouseEvent::CursorMoved { x: 10.0, y: 5.0 });

    input.mouse().set_mode(MouseMode::Relative);
    input.mouse().process(MouseEvent::RawMotion { dx: 5.0, dy: 3.0 });
    input.update().unwrap();
    let state = input.mouse_tracker().last_state();
    assert_eq!((state.x, state.y), (5.0, 3.0));

    input.mouse().set_mode(MouseMode::Absolute);
    input.mouse().set_mode(MouseMode::Relative);
    let state = input.mouse().get_state();
    assert_eq!((state.x, state.y), (0.0, 0.0));

    assert!(cursor.calls().contains(&CursorCall::Confine(WindowHandle(42))));
    assert!(cursor.calls().contains(&CursorCall::SetPosition(110.0, 205.0)));
}

#[test]
fn scroll_survives_end_of_frame() {
    let pads = VirtualGamepads::new(4);
    let input = headless_input(&pads);
    let mouse = input.mouse();
    mouse.set_mode(MouseMode::Relative);
    mouse.process(MouseEvent::Wheel { notches: 3.0 });
    mouse.process(MouseEvent::RawMotion { dx: 1.0, dy: 1.0 });

    input.end_frame();
    let state = mouse.get_state();
    assert_eq!(state.scroll_wheel_value, 360);
    assert_eq!((state.x, state.y), (0.0, 0.0));

    mouse.process(MouseEvent::RawMotion { dx: 2.0, dy: 2.0 });
    mouse.reset_scroll_wheel_value();
    let state = mouse.get_state();
    assert_eq!(state.scroll_wheel_value, 0);
    assert_eq!((state.x, state.y), (2.0, 2.0));
}

#[test]
fn empty_slot_five_is_disconnected() {
    let manager = GamepadManager::new(VirtualGamepads::new(8));
    let state = manager.get_state(PlayerIndex::Slot(5), DeadZone::None);
    assert_eq!(state, GamepadState::default());
    assert!(!state.connected);
}

#[test]
fn reconnect_keeps_slot_two() {
    init_logging();
    let pads = VirtualGamepads::new(4);
    let manager = GamepadManager::new(pads.clone());
    let ids: Vec<DeviceId> = ["pad-a", "pad-b", "pad-c"]
        .into_iter()
        .map(DeviceId::from)
        .collect();
    for id in &ids {
        pads.plug(id.clone());
        manager.on_device_changed(id, false, true);
    }

    manager.on_device_changed(&ids[0], true, false);
    manager.on_device_changed(&ids[2], true, false);
    assert_eq!(manager.on_device_changed(&ids[2], false, true), Some(2));
    assert_eq!(manager.player_of(&ids[2]), Some(2));
    assert!(manager.get_state(PlayerIndex::MostRecent, DeadZone::None).connected);
}

#[test]
fn hot_plug_from_another_thread() {
    let pads = VirtualGamepads::new(4);
    let mut input = headless_input(&pads);
    let manager = Arc::clone(input.gamepads());

    let id = DeviceId::from("usb-1");
    pads.plug(id.clone());
    let callback_id = id.clone();
    thread::spawn(move || {
        manager.on_device_changed(&callback_id, false, true);
    })
    .join()
    .unwrap();

    pads.update(&id, |r| r.buttons.start = true);
    input.update().unwrap();
    assert!(input.get_button_down("joystick menu"));
    assert_eq!(input.gamepad_tracker().get(GamepadButton::Start), ButtonState::Pressed);
}

#[test]
fn suspend_and_resume_cycle() {
    let pads = VirtualGamepads::new(4);
    let manager = GamepadManager::new(pads.clone());
    let a = DeviceId::from("a");
    pads.plug(a.clone());
    manager.on_device_changed(&a, false, true);
    assert!(manager.set_vibration(PlayerIndex::Slot(0), Vibration::new(0.5, 0.5, 0.0, 0.0)));

    manager.suspend();
    assert_eq!(pads.last_vibration(&a), Some(Vibration::OFF));
    assert!(manager.get_state(PlayerIndex::Slot(0), DeadZone::None).connected);

    pads.unplug(&a);
    manager.resume();
    assert_eq!(manager.connected_count(), 0);
}

#[test]
fn held_pad_button_stays_held_through_suspend() {
    let pads = VirtualGamepads::new(4);
    let mut input = headless_input(&pads);
    let id = DeviceId::from("pad");
    pads.plug(id.clone());
    input.gamepads().on_device_changed(&id, false, true);
    pads.update(&id, |r| r.buttons.a = true);

    input.update().unwrap();
    assert!(input.get_button_down("joystick button 1"));
    input.update().unwrap();

    input.gamepads().suspend();
    input.update().unwrap();
    assert_eq!(input.gamepad_tracker().get(GamepadButton::A), ButtonState::Held);
    input.gamepads().resume();
    input.update().unwrap();
    assert_eq!(input.gamepad_tracker().get(GamepadButton::A), ButtonState::Held);
    assert!(!input.get_button_down("joystick button 1"));
}

#[test]
fn touch_between_update_and_end_frame_is_seen_as_began() {
    let pads = VirtualGamepads::new(4);
    let mut input = headless_input(&pads);
    input.update().unwrap();
    input.touch().touch_began(1, 0.5, 0.5, 1.0);
    input.end_frame();

    input.update().unwrap();
    assert_eq!(
        input.touch_state().get(1).map(|p| p.phase),
        Some(TouchPhase::Began)
    );
}

#[test]
fn config_loads_from_toml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("input.toml");
    std::fs::write(
        &toml_path,
        r#"
        dead_zone = "none"

        [[axes]]
        name = "Turn"
        negative = "q"
        positive = "e"
        "#,
    )
    .unwrap();
    let config = InputConfig::load(&toml_path).unwrap();
    assert_eq!(config.dead_zone, DeadZone::None);
    assert_eq!(config.axes[0].name, "Turn");

    let json_path = dir.path().join("input.json");
    std::fs::write(&json_path, r#"{ "thumb_dead_zone": 0.1 }"#).unwrap();
    let config = InputConfig::load(&json_path).unwrap();
    assert_eq!(config.thumb_dead_zone, 0.1);

    let pads = VirtualGamepads::new(4);
    let source = ScriptedSource::new();
    let config = InputConfig::load(&toml_path).unwrap();
    let mut input = Input::new(&config, pads, NullCursor::default())
        .unwrap()
        .with_source(source.clone());
    source.push_frame([ScriptedEvent::KeyDown(Key::letter('q').unwrap())]);
    input.update().unwrap();
    assert_eq!(input.get_axis("Turn"), -1.0);
    assert_eq!(input.get_axis("Horizontal"), 0.0);
}

#[test]
fn config_errors_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "dead_zone = 3").unwrap();
    match InputConfig::load(&path) {
        Err(InputError::Config { path: Some(p), .. }) => assert_eq!(p, path),
        other => panic!("unexpected result: {other:?}"),
    }

    let missing = dir.path().join("missing.toml");
    assert!(matches!(InputConfig::load(&missing), Err(InputError::Io { .. })));
}
