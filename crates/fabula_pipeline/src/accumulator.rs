//! The incremental page accumulator.
//!
//! Every per-page stage (prose, visual beats, rendering) is the same fold:
//! generate page N with the ordered results of pages 1..N-1 as context, report
//! and persist it, then move to N+1. Page N's context is only correct once
//! page N-1 has resolved, so calls are never issued concurrently for one
//! story.

use async_trait::async_trait;
use fabula_error::FabulaResult;

/// Produces one page given the ordered results of all prior pages.
#[async_trait]
pub trait PageGenerator<T>: Send + Sync {
    /// Generate page `page_number`. `prior` holds pages 1..N-1 in order.
    async fn generate(&self, page_number: u32, prior: &[T]) -> FabulaResult<T>;
}

/// Receives each completed page immediately, before the next is generated.
///
/// Implementations persist the checkpoint and emit progress; a failure here
/// aborts the fold the same way a generation failure does.
#[async_trait]
pub trait PageSink<T>: Send + Sync {
    /// Called once per completed page with the page and all pages so far.
    async fn on_page(&self, page: &T, pages_so_far: &[T]) -> FabulaResult<()>;
}

/// Sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPageSink;

#[async_trait]
impl<T: Send + Sync> PageSink<T> for NullPageSink {
    async fn on_page(&self, _page: &T, _pages_so_far: &[T]) -> FabulaResult<()> {
        Ok(())
    }
}

/// Drive a per-page generation capability across `page_count` pages.
///
/// `completed` seeds the fold with already-finished pages so a resumed run
/// never regenerates them; generation starts at page `completed.len() + 1`.
/// A `page_count` of zero (or a fully seeded fold) returns without invoking
/// the generator.
///
/// # Errors
///
/// A failure at page N aborts before page N+1; pages 1..N-1 have already
/// passed through the sink and stay persisted.
#[tracing::instrument(skip(completed, generator, sink), fields(completed = completed.len()))]
pub async fn accumulate<T, G, S>(
    page_count: u32,
    completed: Vec<T>,
    generator: &G,
    sink: &S,
) -> FabulaResult<Vec<T>>
where
    T: Send + Sync,
    G: PageGenerator<T> + ?Sized,
    S: PageSink<T> + ?Sized,
{
    let mut pages = completed;

    let first = pages.len() as u32 + 1;
    for page_number in first..=page_count {
        let page = generator.generate(page_number, &pages).await?;
        pages.push(page);

        if let Some(page) = pages.last() {
            sink.on_page(page, &pages).await?;
        }

        tracing::debug!(page_number, total = page_count, "Accumulated page");
    }

    Ok(pages)
}
