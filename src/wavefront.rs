//! Wave-parallel fill of the score matrix.
//!
//! Cells sharing `i + j` only depend on cells with a smaller sum, so each
//! anti-diagonal is filled in parallel and the next one starts only after
//! every worker of the current one has returned.

use std::{
    fmt,
    ops::Range,
    str::FromStr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    grid::{Cell, GridView},
    recurrence::Recurrence,
    session::AlignmentSession,
    traceback::TracebackStart,
    AlignError, Aligner, Alignment, Mode, ParseOptionError, ScoringContext,
};

const DEFAULT_QUEUE_CHUNK: usize = 32;

/// One anti-diagonal of interior cells: `len` cells starting at `first` and
/// walking one row down, one column left per cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wave {
    pub first: (usize, usize),
    pub len: usize,
}

impl Wave {
    pub fn diagonal(&self) -> usize {
        self.first.0 + self.first.1
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (i, j) = self.first;
        (0..self.len).map(move |k| (i + k, j - k))
    }

    /// Contiguous offsets of at most `workers` batches covering the wave,
    /// each `ceil(len / workers)` long except possibly the last.
    pub fn batches(&self, workers: usize) -> Vec<Range<usize>> {
        let size = self.len.div_ceil(workers.max(1)).max(1);
        (0..self.len)
            .step_by(size)
            .map(|start| start..(start + size).min(self.len))
            .collect()
    }
}

/// Anti-diagonals of the interior of a grid with `rows` sequence-2 symbols
/// and `cols` sequence-1 symbols, in dependency order.
///
/// The first phase starts one wave at each cell of row 1; the second starts
/// one at each remaining cell of the last column. Every interior cell lies on
/// exactly one wave.
pub fn plan(rows: usize, cols: usize) -> Vec<Wave> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let top = (1..=cols).map(|j| Wave {
        first: (1, j),
        len: j.min(rows),
    });
    let right = (2..=rows).map(|i| Wave {
        first: (i, cols),
        len: (rows - i + 1).min(cols),
    });
    top.chain(right).collect()
}

/// How a wave is split among workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One contiguous batch per worker.
    #[default]
    Static,
    /// Fixed-size chunks pulled from a shared queue until it drains.
    Queue,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Static => f.write_str("static"),
            Strategy::Queue => f.write_str("queue"),
        }
    }
}

impl FromStr for Strategy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Strategy::Static),
            "queue" => Ok(Strategy::Queue),
            _ => Err(ParseOptionError {
                kind: "scheduling strategy",
                value: s.to_string(),
                expected: "static, queue",
            }),
        }
    }
}

/// Cooperative cancellation, observed between waves.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Counters from one fill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillStats {
    pub waves: usize,
    pub batches: usize,
    pub cells: usize,
}

/// Drives the recurrence over a grid wave by wave on a fixed pool of
/// workers. The pool lives as long as the scheduler and may serve many
/// alignments.
pub struct Scheduler {
    pool: ThreadPool,
    workers: usize,
    strategy: Strategy,
    queue_chunk: usize,
    cancel: Option<CancelToken>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("workers", &self.workers)
            .field("strategy", &self.strategy)
            .field("queue_chunk", &self.queue_chunk)
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}

impl Scheduler {
    pub fn new(workers: usize, strategy: Strategy) -> Result<Self, AlignError> {
        if workers == 0 {
            return Err(AlignError::NoWorkers);
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|n| format!("wavefront-{n}"))
            .build()?;
        Ok(Scheduler {
            pool,
            workers,
            strategy,
            queue_chunk: DEFAULT_QUEUE_CHUNK,
            cancel: None,
        })
    }

    pub fn with_queue_chunk(mut self, queue_chunk: usize) -> Result<Self, AlignError> {
        if queue_chunk == 0 {
            return Err(AlignError::EmptyQueueChunk);
        }
        self.queue_chunk = queue_chunk;
        Ok(self)
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Fill every interior cell of the session's grid.
    pub fn fill(&self, session: &mut AlignmentSession<'_>) -> Result<FillStats, AlignError> {
        self.fill_observed(session, |_| {})
    }

    /// `fill`, calling `after_wave` with the running totals once each wave's
    /// barrier has passed.
    fn fill_observed(
        &self,
        session: &mut AlignmentSession<'_>,
        mut after_wave: impl FnMut(&FillStats),
    ) -> Result<FillStats, AlignError> {
        let (rec, grid) = session.parts_mut();
        let waves = plan(grid.rows() - 1, grid.cols() - 1);
        let _span = tracing::debug_span!(
            "fill",
            rows = grid.rows(),
            cols = grid.cols(),
            workers = self.workers,
            strategy = %self.strategy
        )
        .entered();

        let mut stats = FillStats::default();
        for wave in &waves {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(completed = stats.waves, "fill cancelled");
                return Err(AlignError::Cancelled {
                    completed: stats.waves,
                    total: waves.len(),
                });
            }
            let run = grid.layout().run(wave.first, wave.len);
            let (view, cells) = grid.split_run(run);
            let batches = match self.strategy {
                Strategy::Static => self.run_static(&rec, view, wave, cells),
                Strategy::Queue => self.run_queue(&rec, view, wave, cells),
            };
            tracing::trace!(diagonal = wave.diagonal(), len = wave.len, batches, "wave done");
            stats.waves += 1;
            stats.batches += batches;
            stats.cells += wave.len;
            after_wave(&stats);
        }
        Ok(stats)
    }

    // Each wave runs inside one pool scope; the scope returns only after
    // every batch spawned for the wave has finished.
    fn run_static(
        &self,
        rec: &Recurrence<'_>,
        view: GridView<'_>,
        wave: &Wave,
        cells: &mut [Cell],
    ) -> usize {
        let batches = wave.batches(self.workers);
        let size = batches.first().map_or(1, |b| b.len());
        self.pool.scope(|scope| {
            for (batch, chunk) in batches.iter().zip(cells.chunks_mut(size)) {
                let (i, j) = wave.first;
                let first = (i + batch.start, j - batch.start);
                scope.spawn(move |_| rec.evaluate_run(view, first, chunk));
            }
        });
        batches.len()
    }

    fn run_queue(
        &self,
        rec: &Recurrence<'_>,
        view: GridView<'_>,
        wave: &Wave,
        cells: &mut [Cell],
    ) -> usize {
        let chunk = self.queue_chunk;
        let total = wave.len.div_ceil(chunk);
        let queue = Mutex::new(cells.chunks_mut(chunk).enumerate());
        let pullers = self.workers.min(total);
        self.pool.scope(|scope| {
            for _ in 0..pullers {
                scope.spawn(|_| loop {
                    let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                    let Some((n, part)) = next else {
                        break;
                    };
                    let (i, j) = wave.first;
                    rec.evaluate_run(view, (i + n * chunk, j - n * chunk), part);
                });
            }
        });
        total
    }
}

/// Parallel wavefront aligner.
#[derive(Clone, Debug)]
pub struct WavefrontAligner<'a> {
    a: &'a [u8],
    b: &'a [u8],
    scoring: &'a ScoringContext,
    mode: Mode,
    workers: usize,
    strategy: Strategy,
    queue_chunk: usize,
    start: TracebackStart,
    cancel: Option<CancelToken>,
}

impl<'a> Aligner<'a> for WavefrontAligner<'a> {
    fn with(a: &'a [u8], b: &'a [u8], scoring: &'a ScoringContext) -> Self {
        WavefrontAligner {
            a,
            b,
            scoring,
            mode: Mode::Global,
            workers: rayon::current_num_threads(),
            strategy: Strategy::Static,
            queue_chunk: DEFAULT_QUEUE_CHUNK,
            start: TracebackStart::Best,
            cancel: None,
        }
    }

    fn align(&self) -> Result<Alignment, AlignError> {
        let mut scheduler =
            Scheduler::new(self.workers, self.strategy)?.with_queue_chunk(self.queue_chunk)?;
        if let Some(cancel) = &self.cancel {
            scheduler = scheduler.with_cancel(cancel.clone());
        }
        self.align_on(&scheduler)
    }
}

impl<'a> WavefrontAligner<'a> {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_queue_chunk(mut self, queue_chunk: usize) -> Self {
        self.queue_chunk = queue_chunk;
        self
    }

    pub fn with_traceback(mut self, start: TracebackStart) -> Self {
        self.start = start;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Align on an existing scheduler, reusing its worker pool. The
    /// scheduler's own worker count, strategy and cancel token apply.
    pub fn align_on(&self, scheduler: &Scheduler) -> Result<Alignment, AlignError> {
        let mut session = AlignmentSession::new(self.a, self.b, self.scoring, self.mode)?;
        let stats = scheduler.fill(&mut session)?;
        let aln = session.finish(self.start);
        tracing::info!(
            mode = %self.mode,
            score = aln.score,
            columns = aln.len(),
            waves = stats.waves,
            batches = stats.batches,
            "alignment complete"
        );
        Ok(aln)
    }
}
