use std::net::SocketAddr;
use std::str::FromStr;

use error_stack::{Report, ResultExt};
use vodca::References;

use kernel::KernelError;

static BOOKSHELF_STORE: &str = "BOOKSHELF_STORE";
static BIND_ADDR: &str = "BIND_ADDR";
static DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown {BOOKSHELF_STORE} value: {other}"))),
        }
    }
}

#[derive(Debug, References)]
pub struct AppConfig {
    store: StoreKind,
    bind_addr: SocketAddr,
}

impl AppConfig {
    /// Reads the process environment, after loading `.env` when one exists.
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> error_stack::Result<Self, KernelError> {
        let store = lookup(BOOKSHELF_STORE)
            .map(|value| value.parse::<StoreKind>())
            .transpose()?
            .unwrap_or(StoreKind::Postgres);
        let bind_addr = lookup(BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("{BIND_ADDR} is not a socket address"))?;
        Ok(Self { store, bind_addr })
    }
}
