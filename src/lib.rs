//! # install-run Core Library
//!
//! This crate contains the logic behind the `install-run` tool: a bootstrap installer for build
//! pipelines. Given `<name>@<version>` and a binary name, it makes sure that exact package version is
//! installed into a private per-version folder under `<projectRoot>/common/temp/install-run/`, then runs
//! the binary with the caller's arguments and forwards its exit code.
//!
//! The package manager (`npm`) and the installed binaries are external processes, reached through the
//! [`ProcessRunner`] capability so everything above it can be driven by a fake in tests.
//!
//! ## Modules Overview
//! - [`specifier`] – Parsing `name[@version]` package specifiers
//! - [`paths`] – Finding the project root (`rush.json`) and building cache folders
//! - [`resolver`] – Turning version ranges into static versions via `npm view`
//! - [`npmrc`] – Copying `.npmrc` while dropping lines with unset environment variables
//! - [`installer`] – The per-`name@version` install cache: markers, cleaning, `npm install`
//! - [`lock`] – Advisory lock serializing installs of the same package
//! - [`invoker`] – Install-then-run orchestration and exit code handling
//! - [`context`] – Per-run state with memoized host lookups
//! - [`config`] – Optional `install-run.toml` settings
//! - [`process`] – Running external executables
//! - [`util`] – Platform constants and small helpers


pub mod error;
pub mod specifier;
pub mod paths;
pub mod process;
pub mod config;
pub mod context;
pub mod npmrc;
pub mod resolver;
pub mod lock;
pub mod installer;
pub mod invoker;
pub mod util;

pub use error::*;
pub use specifier::*;
pub use process::*;
pub use config::*;
pub use context::*;
pub use resolver::*;
pub use installer::*;
pub use invoker::*;
