//! Shows the dispatch events emitted with the `tracing` feature
//!
//! Run with: cargo run --example tracing_demo --features tracing

use undertow::effects::reader::{self, Reader};
use undertow::effects::state::{self, State};
use undertow::prelude::*;

type Es = Stack![State<u32>, Reader<u32>];

fn bump() -> impl Eff<Output = u32, Stack = Es> {
    reader::ask::<u32, Es, _>()
        .and_then(|step| state::modify::<u32, Es, _, _>(move |n| n + step))
        .then(state::get::<u32, Es, _>())
        .instrument(tracing::info_span!("bump"))
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    tracing::info!("Starting tracing demo");

    let doubled = reader::local::<u32, Es, _, _, _>(|step| step * 2, bump());
    let program = bump().then(doubled);
    let (last, total) = run_pure(reader::run_reader(3, state::run_state(0, program)));

    tracing::info!(last, total, "Program finished");
}
