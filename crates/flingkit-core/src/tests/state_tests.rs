use super::*;

#[test]
fn equal_writes_are_ignored() {
    let state = MutableState::new(1.0f32);
    assert!(!state.set_value(1.0));
    assert_eq!(state.version(), 0);

    assert!(state.set_value(2.0));
    assert_eq!(state.version(), 1);
    assert_eq!(state.get(), 2.0);
}

#[test]
fn never_equal_policy_notifies_every_write() {
    let state = MutableState::with_policy(0u32, NeverEqual);
    state.set(0);
    state.set(0);
    assert_eq!(state.version(), 2);
}

#[test]
fn read_only_view_tracks_writes() {
    let state = MutableState::new(0i32);
    let view = state.as_state();
    state.update(|value| *value += 5);

    assert_eq!(view.get(), 5);
    assert_eq!(view.version(), state.version());
}

#[test]
fn listeners_see_new_value_until_unsubscribed() {
    let state = MutableState::new(0i32);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let subscription = {
        let seen = Rc::clone(&seen);
        state.as_state().subscribe(move |value| seen.borrow_mut().push(*value))
    };
    state.set(1);
    state.set(1);
    state.set(2);
    subscription.unsubscribe();
    state.set(3);

    assert_eq!(seen.borrow().as_slice(), &[1, 2]);
}

#[test]
fn listener_may_write_back_into_state() {
    let state = MutableState::new(0i32);
    let writer = state.clone();
    let _subscription = state.subscribe(move |value| {
        if *value < 3 {
            writer.set(*value + 1);
        }
    });

    state.set(1);
    assert_eq!(state.get(), 3);
}

#[test]
fn detached_listener_stays_attached() {
    let state = MutableState::new(0i32);
    let hits = Rc::new(Cell::new(0));
    {
        let hits = Rc::clone(&hits);
        state.subscribe(move |_| hits.set(hits.get() + 1)).detach();
    }
    state.set(1);
    state.set(2);
    assert_eq!(hits.get(), 2);
}
