//! Assembles the resolved parts into the descriptor handed to the session engine.

mod builder;
pub use builder::ServerBuilder;

mod descriptor;
pub use descriptor::RuntimeServerDescriptor;

mod policy;
pub use policy::ServerPolicy;

use slog::Drain;

pub(crate) fn default_logger() -> slog::Logger {
    slog::Logger::root(slog_stdlog::StdLog {}.fuse(), slog::o!())
}
