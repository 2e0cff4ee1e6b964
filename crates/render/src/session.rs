//! Render sessions and their lifecycle.
//!
//! A [`RenderSession`] is the unit of rendering state. Callers obtain one from
//! a [`SessionProvider`] through [`SessionLease`], which hands the session back
//! when dropped, so a session is released on every exit path including errors.

use crate::error::RenderError;
use crate::fonts::FontLibrary;
use crate::pdf::render_pdf;
use crate::raster::render_png;
use crate::scene::LabelScene;
use labelpress_types::{OutputFormat, PageSize, RenderedArtifact};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Cooperative time budget checked between drawing steps.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Option<Duration>,
}

impl Deadline {
    pub fn new(budget: Option<Duration>) -> Self {
        Self { started: Instant::now(), budget }
    }

    pub fn unbounded() -> Self {
        Self::new(None)
    }

    pub fn check(&self) -> Result<(), RenderError> {
        match self.budget {
            Some(budget) if self.started.elapsed() > budget => {
                Err(RenderError::Timeout { budget_ms: budget.as_millis() })
            }
            _ => Ok(()),
        }
    }
}

/// Rendering state for one label at a time.
#[derive(Debug)]
pub struct RenderSession {
    id: u64,
    fonts: Arc<FontLibrary>,
    budget: Option<Duration>,
    renders: usize,
}

impl RenderSession {
    pub fn new(id: u64, fonts: Arc<FontLibrary>, budget: Option<Duration>) -> Self {
        Self { id, fonts, budget, renders: 0 }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of renders attempted in this session.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Renders bound label markup to an artifact of exactly `size`.
    pub fn render(
        &mut self,
        markup: &str,
        size: PageSize,
        format: OutputFormat,
    ) -> Result<RenderedArtifact, RenderError> {
        self.renders += 1;
        let deadline = Deadline::new(self.budget);
        let scene = LabelScene::parse(markup)?;
        deadline.check()?;

        let artifact = match format {
            OutputFormat::Pdf => RenderedArtifact::pdf(render_pdf(&scene, size, &deadline)?, size),
            OutputFormat::Png => {
                let (png, pixels) = render_png(&scene, size, &self.fonts, &deadline)?;
                RenderedArtifact::png(png, size, pixels)
            }
        };
        deadline.check()?;
        log::debug!(
            "Session #{} rendered {} bytes of {} ({}x{} mm)",
            self.id,
            artifact.len(),
            format.media_type(),
            size.width_mm,
            size.height_mm
        );
        Ok(artifact)
    }
}

/// Source of render sessions.
///
/// Implementations decide whether sessions are created fresh or reused. Every
/// session handed out by `acquire` is passed back to `release` exactly once.
pub trait SessionProvider: Send + Sync + fmt::Debug {
    fn acquire(&self) -> Result<RenderSession, RenderError>;

    fn release(&self, session: RenderSession);

    /// A short name for logs.
    fn name(&self) -> &'static str;
}

/// A session on loan from a provider, returned on drop.
pub struct SessionLease<'a> {
    provider: &'a dyn SessionProvider,
    session: Option<RenderSession>,
}

impl<'a> SessionLease<'a> {
    pub fn acquire(provider: &'a dyn SessionProvider) -> Result<Self, RenderError> {
        let session = provider.acquire()?;
        Ok(Self { provider, session: Some(session) })
    }
}

impl Deref for SessionLease<'_> {
    type Target = RenderSession;

    fn deref(&self) -> &RenderSession {
        // Only `drop` takes the session out.
        self.session.as_ref().unwrap_or_else(|| unreachable!("session already released"))
    }
}

impl DerefMut for SessionLease<'_> {
    fn deref_mut(&mut self) -> &mut RenderSession {
        self.session.as_mut().unwrap_or_else(|| unreachable!("session already released"))
    }
}

impl Drop for SessionLease<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            self.provider.release(session);
        }
    }
}

/// Opens a fresh session per render and tears it down afterwards, so no
/// state carries over between labels.
#[derive(Debug)]
pub struct IsolatedSessions {
    fonts: Arc<FontLibrary>,
    budget: Option<Duration>,
    next_id: AtomicU64,
    open: AtomicUsize,
}

impl IsolatedSessions {
    pub fn new(fonts: Arc<FontLibrary>, budget: Option<Duration>) -> Self {
        Self { fonts, budget, next_id: AtomicU64::new(1), open: AtomicUsize::new(0) }
    }

    /// Sessions acquired and not yet released.
    pub fn open_sessions(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

impl SessionProvider for IsolatedSessions {
    fn acquire(&self) -> Result<RenderSession, RenderError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.open.fetch_add(1, Ordering::SeqCst);
        log::debug!("Opened render session #{}", id);
        Ok(RenderSession::new(id, Arc::clone(&self.fonts), self.budget))
    }

    fn release(&self, session: RenderSession) {
        self.open.fetch_sub(1, Ordering::SeqCst);
        log::debug!("Closed render session #{} after {} render(s)", session.id(), session.renders());
    }

    fn name(&self) -> &'static str {
        "isolated"
    }
}
