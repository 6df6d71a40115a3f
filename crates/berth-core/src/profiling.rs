//! Profiling hooks based on the `puffin` crate.
//!
//! Scopes are compiled in unconditionally and cost almost nothing until
//! [`init_profiling`] turns them on.

pub use puffin::{GlobalProfiler, profile_function, profile_scope};

/// Profiling backend options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingBackend {
    /// Collect scopes in-process only.
    InProcess,
    /// Send profiling data to puffin_viewer via HTTP.
    #[cfg(feature = "profiling")]
    PuffinHttp,
}

#[cfg(feature = "profiling")]
static PROFILING_SERVER: std::sync::OnceLock<puffin_http::Server> = std::sync::OnceLock::new();

/// Turn on scope collection with the given backend.
pub fn init_profiling(backend: ProfilingBackend) {
    puffin::set_scopes_on(true);
    match backend {
        ProfilingBackend::InProcess => {}
        #[cfg(feature = "profiling")]
        ProfilingBackend::PuffinHttp => match puffin_http::Server::new("127.0.0.1:8585") {
            Ok(server) => {
                tracing::info!("Puffin profiler server started on http://127.0.0.1:8585");
                let _ = PROFILING_SERVER.set(server);
            }
            Err(e) => {
                tracing::error!("Failed to start puffin server: {}", e);
            }
        },
    }
}

/// Mark a frame boundary. Hosts call this once per event-loop turn.
#[inline]
pub fn new_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_process_profiling() {
        init_profiling(ProfilingBackend::InProcess);
        assert!(puffin::are_scopes_on());
        {
            profile_scope!("layout");
        }
        new_frame();
    }
}
