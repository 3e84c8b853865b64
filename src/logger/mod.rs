//! Logger module
//!
//! Startup banner, access log entries and error/warning lines. Info and
//! access output goes to stdout, errors and warnings to stderr.

mod format;

pub use format::AccessLogEntry;

/// Print the startup banner: the server URL and how to stop it.
pub fn log_server_start(port: u16) {
    println!("Servidor iniciado en http://localhost:{port}");
    println!("Presiona Ctrl+C para detener");
}

/// Print the shutdown notice once the interrupt arrives.
pub fn log_shutdown() {
    println!("\nServidor detenido");
}

/// Log one completed request in Common Log Format.
pub fn log_access(entry: &AccessLogEntry) {
    println!("{}", entry.format_common());
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}
