//! Ready-made effects built on the public dispatch API.
//!
//! | Effect | Operations | Handlers |
//! |---|---|---|
//! | [`Reader<R>`](reader::Reader) | `ask`, `asks`, `local` | `run_reader` |
//! | [`State<S>`](state::State) | `get`, `put`, `modify`, `gets`, `state` | `run_state`, `eval_state`, `exec_state` |
//! | [`Error<Er>`](error::Error) | `throw`, `catch`, `from_result` | `run_error`, `map_error` |
//! | [`Writer<W>`](writer::Writer) | `tell`, `listen` | `run_writer` |
//! | [`Fresh`](fresh::Fresh) | `fresh` | `run_fresh` |
//! | [`Output<O>`](output::Output) | `output` | `output_to_vec`, `ignore_output`, `output_to_writer`, `output_through_writer` |
//!
//! Every operation function is generic over the stack it is sent from: it
//! takes the stack `Es` and a membership index `I`, both normally inferred.

pub mod error;
pub mod fresh;
pub mod output;
pub mod reader;
pub mod state;
pub mod writer;
