use std::collections::BTreeMap;

use crate::compile::cache::ModuleCache;
use crate::compile::fingerprint::{ContentHash, fingerprint_overrides};
use crate::compile::single_flight::SingleFlight;
use crate::foundation::error::StageResult;
use crate::scene::runtime::{CompileService, ModuleLoader, SceneModule};

/// What a compile ticket's result is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketPurpose {
    /// Install the compiled module as the current scene.
    Install,
    /// Cache-warm refresh after a cache hit; result is cached, never
    /// installed over the already-running scene.
    RefreshCache,
}

/// One service round-trip the host must perform.
///
/// The compile service call is the engine's only true suspension point, so it
/// is reified: [`SceneCompiler::request`] hands out a ticket, the host calls
/// the service with `overrides`, and feeds the outcome back through
/// [`SceneCompiler::complete`].
#[derive(Clone, Debug)]
pub struct CompileTicket {
    /// Override set to compile, snapshotted at ticket creation.
    pub overrides: BTreeMap<String, String>,
    /// Content hash of `overrides`.
    pub hash: ContentHash,
    /// What to do with the result.
    pub purpose: TicketPurpose,
}

/// The currently installed scene module.
pub struct LoadedScene {
    /// Instantiated module.
    pub module: Box<dyn SceneModule>,
    /// Identity counter; bumps on every install so downstream consumers can
    /// detect player replacement.
    pub generation: u64,
    /// Hash of the override set this module was compiled from.
    pub hash: ContentHash,
}

/// Compiles override sets into the session's current scene module.
///
/// Caches by content hash, keeps at most one compile in flight, and coalesces
/// bursts of change events into exactly one follow-up compile using the
/// override set current at settle time.
pub struct SceneCompiler {
    project_id: String,
    loader: Box<dyn ModuleLoader>,
    cache: Box<dyn ModuleCache>,
    flight: SingleFlight,
    latest_overrides: BTreeMap<String, String>,
    current: Option<LoadedScene>,
    generation: u64,
    last_error: Option<String>,
}

impl SceneCompiler {
    /// Create a compiler bound to one project.
    pub fn new(
        project_id: impl Into<String>,
        loader: Box<dyn ModuleLoader>,
        cache: Box<dyn ModuleCache>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            loader,
            cache,
            flight: SingleFlight::new(),
            latest_overrides: BTreeMap::new(),
            current: None,
            generation: 0,
            last_error: None,
        }
    }

    /// Request compilation of an override set.
    ///
    /// Returns a ticket when a service round-trip must be performed now, or
    /// `None` when a compile is already in flight (the request is coalesced;
    /// the follow-up issued at settle time uses the latest override set).
    ///
    /// On a cache hit the module is instantiated immediately, no install
    /// round-trip happens, and the returned ticket is a background cache
    /// refresh.
    #[tracing::instrument(skip(self, overrides), fields(project = %self.project_id))]
    pub fn request(&mut self, overrides: BTreeMap<String, String>) -> Option<CompileTicket> {
        self.latest_overrides = overrides;
        if !self.flight.try_begin() {
            tracing::debug!("compile in flight, coalescing request");
            return None;
        }
        Some(self.begin_ticket())
    }

    /// Feed a settled service outcome back into the compiler.
    ///
    /// Returns the single follow-up ticket when change events arrived while
    /// this flight was in progress.
    #[tracing::instrument(skip(self, ticket, outcome), fields(project = %self.project_id))]
    pub fn complete(
        &mut self,
        ticket: CompileTicket,
        outcome: StageResult<String>,
    ) -> Option<CompileTicket> {
        match outcome {
            Ok(module_text) => {
                if let Err(e) = self
                    .cache
                    .put(&self.project_id, ticket.hash, &module_text)
                {
                    tracing::warn!(error = %e, "failed to write module cache");
                }
                if ticket.purpose == TicketPurpose::Install {
                    self.install(&module_text, ticket.hash);
                }
            }
            Err(e) => match ticket.purpose {
                TicketPurpose::Install => {
                    tracing::debug!(error = %e, "compile failed");
                    self.last_error = Some(e.to_string());
                }
                TicketPurpose::RefreshCache => {
                    tracing::warn!(error = %e, "background cache refresh failed");
                }
            },
        }

        if self.flight.settle() {
            // The guard stays held across settle; this is the one coalesced
            // follow-up, built from the override set current right now.
            Some(self.begin_ticket())
        } else {
            None
        }
    }

    /// Drive the request/complete loop synchronously against a service.
    ///
    /// Convenience for hosts without a real async boundary; the coalescing
    /// machinery still applies if `request` is called re-entrantly from
    /// runtime callbacks.
    pub fn compile_now(&mut self, service: &dyn CompileService, overrides: BTreeMap<String, String>) {
        let mut next = self.request(overrides);
        while let Some(ticket) = next {
            let outcome = service.compile(&ticket.overrides);
            next = self.complete(ticket, outcome);
        }
    }

    /// The currently installed scene, if any compile has succeeded.
    pub fn scene(&self) -> Option<&LoadedScene> {
        self.current.as_ref()
    }

    /// Identity counter of the installed scene; 0 before the first install.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Last compile or load failure message, held for the UI banner.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Dismiss the error banner state.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Whether a compile is currently in flight.
    pub fn is_compiling(&self) -> bool {
        self.flight.is_in_flight()
    }

    /// Build the ticket for a newly claimed flight, probing the cache first.
    fn begin_ticket(&mut self) -> CompileTicket {
        let overrides = self.latest_overrides.clone();
        let hash = fingerprint_overrides(&overrides);

        let cached = match self.cache.get(&self.project_id, hash) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, "module cache read failed, compiling fresh");
                None
            }
        };

        match cached {
            Some(module_text) => {
                // Serve the running scene from cache immediately; the service
                // round-trip becomes a fire-and-forget cache warm whose result
                // never replaces the scene installed here.
                self.install(&module_text, hash);
                CompileTicket {
                    overrides,
                    hash,
                    purpose: TicketPurpose::RefreshCache,
                }
            }
            None => CompileTicket {
                overrides,
                hash,
                purpose: TicketPurpose::Install,
            },
        }
    }

    /// Instantiate module text and swap it in as the current scene.
    ///
    /// A load failure leaves the previous scene (if any) installed and
    /// records the error for the UI.
    fn install(&mut self, module_text: &str, hash: ContentHash) {
        match self.loader.load(module_text) {
            Ok(module) => {
                self.generation += 1;
                self.current = Some(LoadedScene {
                    module,
                    generation: self.generation,
                    hash,
                });
                self.last_error = None;
            }
            Err(e) => {
                tracing::debug!(error = %e, "scene module failed to instantiate");
                self.last_error = Some(e.to_string());
            }
        }
    }
}

impl std::fmt::Debug for SceneCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCompiler")
            .field("project_id", &self.project_id)
            .field("generation", &self.generation)
            .field("is_compiling", &self.flight.is_in_flight())
            .field("last_error", &self.last_error)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
