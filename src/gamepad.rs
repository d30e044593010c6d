use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub const BUTTON_COUNT: usize = 16;
pub const AXIS_COUNT: usize = 4;

/// Logical button catalog. Raw indices follow the standard gamepad layout the
/// installation was tuned against and are fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    B,
    A,
    Y,
    X,
    L,
    R,
    Zl,
    Zr,
    Minus,
    Plus,
    LeftStick,
    RightStick,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// Ordered by raw index; `ALL[i].raw_index() == i` holds for every entry.
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::B,
        Button::A,
        Button::Y,
        Button::X,
        Button::L,
        Button::R,
        Button::Zl,
        Button::Zr,
        Button::Minus,
        Button::Plus,
        Button::LeftStick,
        Button::RightStick,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    pub fn raw_index(self) -> usize {
        match self {
            Button::B => 0,
            Button::A => 1,
            Button::Y => 2,
            Button::X => 3,
            Button::L => 4,
            Button::R => 5,
            Button::Zl => 6,
            Button::Zr => 7,
            Button::Minus => 8,
            Button::Plus => 9,
            Button::LeftStick => 10,
            Button::RightStick => 11,
            Button::Up => 12,
            Button::Down => 13,
            Button::Left => 14,
            Button::Right => 15,
        }
    }

    pub fn from_raw(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Button::B => "b",
            Button::A => "a",
            Button::Y => "y",
            Button::X => "x",
            Button::L => "l",
            Button::R => "r",
            Button::Zl => "zl",
            Button::Zr => "zr",
            Button::Minus => "minus",
            Button::Plus => "plus",
            Button::LeftStick => "left_stick",
            Button::RightStick => "right_stick",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}

/// Logical axis catalog: two 2-axis sticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

impl Axis {
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::LeftX, Axis::LeftY, Axis::RightX, Axis::RightY];

    pub fn raw_index(self) -> usize {
        match self {
            Axis::LeftX => 0,
            Axis::LeftY => 1,
            Axis::RightX => 2,
            Axis::RightY => 3,
        }
    }

    pub fn from_raw(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Raw event as delivered by the external gamepad source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamepadEvent {
    ButtonChange { index: usize, pressed: bool },
    AxisChange { index: usize, value: f32 },
}

/// Boundary to the hardware polling collaborator. A missing device is not an
/// error; the session simply produces no events.
pub trait GamepadSource {
    fn start(&mut self) {}
    fn stop(&mut self) {}
    fn drain(&mut self) -> Vec<GamepadEvent>;
}

/// Source for the no-device case: never yields anything.
#[derive(Debug, Default)]
pub struct NullSource;

impl GamepadSource for NullSource {
    fn drain(&mut self) -> Vec<GamepadEvent> {
        Vec::new()
    }
}

/// Queue-backed source used for replay and tests.
#[derive(Debug, Default)]
pub struct QueuedSource {
    pending: VecDeque<GamepadEvent>,
}

impl QueuedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GamepadEvent) {
        self.pending.push_back(event);
    }
}

impl GamepadSource for QueuedSource {
    fn drain(&mut self) -> Vec<GamepadEvent> {
        self.pending.drain(..).collect()
    }
}

/// Shared handle to a source, for callers that need to keep feeding events
/// into a session they have already handed off.
impl<S: GamepadSource> GamepadSource for Rc<RefCell<S>> {
    fn start(&mut self) {
        self.borrow_mut().start();
    }

    fn stop(&mut self) {
        self.borrow_mut().stop();
    }

    fn drain(&mut self) -> Vec<GamepadEvent> {
        self.borrow_mut().drain()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Button(Button),
    Axis(Axis),
}

/// Logical event delivered to a subscribed handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    Activated,
    Released,
    Changed(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    control: Control,
    handler: Box<dyn FnMut(ControlEvent)>,
}

/// Fans raw device events out to subscribed handlers. Button handlers see
/// edge transitions only; axis handlers see every reported value, no deadzone.
/// Delivery is FIFO in subscription order. The router owns no domain state.
pub struct InputRouter {
    subscriptions: Vec<Subscription>,
    pressed: [bool; BUTTON_COUNT],
    next_id: u64,
}

impl InputRouter {
    pub fn new() -> Self {
        Self { subscriptions: Vec::new(), pressed: [false; BUTTON_COUNT], next_id: 0 }
    }

    pub fn subscribe(
        &mut self,
        control: Control,
        handler: impl FnMut(ControlEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, control, handler: Box::new(handler) });
        id
    }

    /// Idempotent: unsubscribing an unknown or already-removed id is a no-op.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscriptions.retain(|sub| sub.id != id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn dispatch(&mut self, event: GamepadEvent) {
        match event {
            GamepadEvent::ButtonChange { index, pressed } => {
                let Some(button) = Button::from_raw(index) else {
                    return;
                };
                if self.pressed[index] == pressed {
                    // Repeated report, not an edge.
                    return;
                }
                self.pressed[index] = pressed;
                let logical =
                    if pressed { ControlEvent::Activated } else { ControlEvent::Released };
                self.deliver(Control::Button(button), logical);
            }
            GamepadEvent::AxisChange { index, value } => {
                let Some(axis) = Axis::from_raw(index) else {
                    return;
                };
                self.deliver(Control::Axis(axis), ControlEvent::Changed(value));
            }
        }
    }

    pub fn button_pressed(&self, button: Button) -> bool {
        self.pressed[button.raw_index()]
    }

    fn deliver(&mut self, control: Control, event: ControlEvent) {
        for sub in self.subscriptions.iter_mut() {
            if sub.control == control {
                (sub.handler)(event);
            }
        }
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped set of router subscriptions. Every id taken through this set is
/// released when the set drops, so a torn-down layer can never receive a
/// callback, even if teardown happens mid-focus.
pub struct SubscriptionSet {
    router: Rc<RefCell<InputRouter>>,
    ids: SmallVec<[SubscriptionId; 8]>,
}

impl SubscriptionSet {
    pub fn new(router: Rc<RefCell<InputRouter>>) -> Self {
        Self { router, ids: SmallVec::new() }
    }

    pub fn subscribe(&mut self, control: Control, handler: impl FnMut(ControlEvent) + 'static) {
        let id = self.router.borrow_mut().subscribe(control, handler);
        self.ids.push(id);
    }
}

impl Drop for SubscriptionSet {
    fn drop(&mut self) {
        let mut router = self.router.borrow_mut();
        for id in self.ids.drain(..) {
            router.unsubscribe(id);
        }
    }
}
