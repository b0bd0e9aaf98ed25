//! Input widget demo against the headless host
//!
//! Run with: cargo run -p sprig_widgets --example input_demo

use std::rc::Rc;

use sprig_core::{state, ComponentOptions, EventKind, Host, HostEvent, ObserveOptions};
use sprig_platform::HeadlessHost;
use sprig_widgets::input;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let host = HeadlessHost::shared();
    let page = host.borrow_mut().create_element("div");

    let name_input = input::create(
        Rc::clone(&host),
        ComponentOptions::new()
            .data(state! { "placeholder": "Your name" })
            .target(page),
    )
    .expect("input construction");

    name_input
        .observe(
            "value",
            |_, new, old| println!("value changed: {old:?} -> {new}"),
            ObserveOptions::new().defer(true),
        )
        .expect("observe value");

    name_input
        .on(input::events::FOCUS, |_, payload| {
            println!("focused: {payload}");
        })
        .expect("subscribe onfocus");

    let element = host.borrow().children_of(page)[0];
    HeadlessHost::emit(&host, element, HostEvent::of(EventKind::Focus));

    name_input
        .set(state! { "value": "Ada", "status": "success" })
        .expect("set value");

    print!("{}", host.borrow().dump(page));

    name_input.teardown(true).expect("teardown");
    println!("after teardown: {} children", host.borrow().child_count(page));
}
