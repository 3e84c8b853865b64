//! Command-line configuration
//!
//! The whole configuration surface: a port and a root directory. There is
//! no config file and no environment layering.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Servidor HTTP de archivos estáticos
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Puerto de escucha
    #[arg(short, long, default_value_t = 8000, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Directorio raíz a servir
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,
}

impl Args {
    /// Validate the root directory and freeze the runtime context.
    ///
    /// The root is canonicalized once here; every per-request containment
    /// check compares against this canonical form.
    pub fn into_context(self) -> io::Result<ServeContext> {
        let root = self.root.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("root directory '{}': {e}", self.root.display()),
            )
        })?;

        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("root '{}' is not a directory", root.display()),
            ));
        }

        Ok(ServeContext {
            root,
            port: self.port,
        })
    }
}

/// Immutable server context shared across connection tasks.
#[derive(Debug, Clone)]
pub struct ServeContext {
    /// Canonicalized root directory; every request path resolves under it.
    pub root: PathBuf,
    pub port: u16,
}

impl ServeContext {
    /// Listen on all interfaces, like the printed `localhost` URL implies
    /// for the local machine.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
