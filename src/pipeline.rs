//! The RX and TX job hand-off pipelines.
//!
//! Both firmware images run the same loop: wait for the driver's enable signal, read the data FIFO
//! geometry, then forever move job cookies from an ingress puzzle FIFO to an egress puzzle FIFO,
//! printing a trace line for every job on the way. The two images only differ in which FIFOs they
//! connect and in how they interpret the cookie flags, both of which are captured by a
//! [Direction].
//!
//! The loop is modelled as a state machine that is advanced one step at a time by
//! [Pipeline::step]. A step that would have to wait for hardware (the enable bit, an empty ingress
//! FIFO, a full egress FIFO) does nothing and returns [Progress::Parked]; calling it again retries.
//! [Pipeline::run] simply keeps stepping, which turns every park into a busy-poll, exactly like a
//! pop from an empty FIFO would stall in hardware.
//!
//! ```text
//! WaitEnable -> ReadConfig -> PollIngress -> Drain(1..4) -> Decode -> Log -> PollEgress -> Forward(1..4)
//!                                  ^                                                            |
//!                                  +------------------------------------------------------------+
//! ```
//!
//! A job is forwarded bit-for-bit as it was received. The decoded cookie only feeds the trace, so
//! bits outside of any cookie field survive the hand-off.

use crate::cookie::{CookieFlags, JobCookie, RxFlags, TxFlags};
use crate::debug_util::{log_words_hex, FormatBinary, FormatJob, FormatWords};
use crate::insn::{FifoId, Transact};
use crate::regs::{CoreInfo, SpConfig};
use crate::sp::StreamProcessor;
use core::marker::PhantomData;
use log::{debug, info, warn, Level};

/// The number of words in a job cookie.
pub const JOB_WORDS: usize = 4;

/// The fixed parameters of one pipeline flavour.
pub trait Direction {
    type Flags: CookieFlags;
    /// The name used in trace lines, `RX` or `TX`.
    const NAME: &'static str;
    /// The FIFO jobs are drained from.
    const INGRESS: FifoId;
    /// The FIFO jobs are forwarded to.
    const EGRESS: FifoId;
}

/// Receive jobs, handed from the RX DMA stage (FIFO 1) to the host-facing stage (FIFO 2).
#[derive(Debug)]
pub enum Rx {}

impl Direction for Rx {
    type Flags = RxFlags;
    const NAME: &'static str = "RX";
    const INGRESS: FifoId = FifoId::Fifo1;
    const EGRESS: FifoId = FifoId::Fifo2;
}

/// Transmit jobs, handed from the host-facing stage (FIFO 0) to the TX DMA stage (FIFO 1).
#[derive(Debug)]
pub enum Tx {}

impl Direction for Tx {
    type Flags = TxFlags;
    const NAME: &'static str = "TX";
    const INGRESS: FifoId = FifoId::Fifo0;
    const EGRESS: FifoId = FifoId::Fifo1;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the driver to set the enable bit.
    WaitEnable,
    /// Configuring caching and reading the data FIFO geometry.
    ReadConfig,
    /// Waiting for the first word of a job.
    PollIngress,
    /// The given number of words has been drained, waiting for the next one.
    Drain(usize),
    Decode,
    Log,
    /// Waiting for room for the first word of a job.
    PollEgress,
    /// The given number of words has been forwarded, waiting for room for the next one.
    Forward(usize),
}

/// The outcome of a [Pipeline::step].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Advanced,
    /// The pipeline is waiting for the hardware and did not change state.
    Parked,
}

pub struct Pipeline<D: Direction, T> {
    sp: StreamProcessor<T>,
    state: State,
    words: [u32; JOB_WORDS],
    job: Option<JobCookie<D::Flags>>,
    pkt: u32,
    config: Option<SpConfig>,
    _direction: PhantomData<D>,
}

pub type RxPipeline<T> = Pipeline<Rx, T>;
pub type TxPipeline<T> = Pipeline<Tx, T>;

impl<D: Direction, T: Transact> Pipeline<D, T> {
    pub fn new(sp: StreamProcessor<T>) -> Pipeline<D, T> {
        Pipeline {
            sp,
            state: State::WaitEnable,
            words: [0; JOB_WORDS],
            job: None,
            pkt: 0,
            config: None,
            _direction: PhantomData,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// The number of jobs decoded and traced so far. Wraps around on overflow.
    pub fn jobs_processed(&self) -> u32 {
        self.pkt
    }

    /// The most recently decoded job.
    pub fn last_job(&self) -> Option<&JobCookie<D::Flags>> {
        self.job.as_ref()
    }

    /// The data FIFO geometry, once it has been read.
    pub fn config(&self) -> Option<SpConfig> {
        self.config
    }

    pub fn sp(&self) -> &StreamProcessor<T> {
        &self.sp
    }

    pub fn sp_mut(&mut self) -> &mut StreamProcessor<T> {
        &mut self.sp
    }

    /// Performs a single state transition, or parks if the hardware is not ready for it.
    pub fn step(&mut self) -> Progress {
        let next = match self.state {
            State::WaitEnable => {
                if !self.sp.enabled() {
                    return Progress::Parked;
                }
                info!("Received start signal.");
                State::ReadConfig
            }
            State::ReadConfig => {
                self.read_config();
                State::PollIngress
            }
            State::PollIngress => {
                if !self.pop(0) {
                    return Progress::Parked;
                }
                State::Drain(1)
            }
            State::Drain(n) => {
                if !self.pop(n) {
                    return Progress::Parked;
                }
                if n + 1 == JOB_WORDS {
                    State::Decode
                } else {
                    State::Drain(n + 1)
                }
            }
            State::Decode => {
                debug!("{}", FormatWords(&self.words));
                log_words_hex(Level::Trace, &self.words);
                self.job = Some(JobCookie::decode(self.words));
                State::Log
            }
            State::Log => {
                if let Some(job) = &self.job {
                    info!(
                        "{}",
                        FormatJob {
                            direction: D::NAME,
                            pkt: self.pkt,
                            cookie: job,
                        }
                    );
                }
                self.pkt = self.pkt.wrapping_add(1);
                State::PollEgress
            }
            State::PollEgress => {
                if !self.push(0) {
                    return Progress::Parked;
                }
                State::Forward(1)
            }
            State::Forward(n) => {
                if !self.push(n) {
                    return Progress::Parked;
                }
                if n + 1 == JOB_WORDS {
                    State::PollIngress
                } else {
                    State::Forward(n + 1)
                }
            }
        };
        self.state = next;
        Progress::Advanced
    }

    /// Steps until the pipeline parks and returns the number of transitions made.
    pub fn step_until_parked(&mut self) -> usize {
        let mut steps = 0;
        while self.step() == Progress::Advanced {
            steps += 1;
        }
        steps
    }

    /// Runs the pipeline forever.
    pub fn run(&mut self) -> ! {
        loop {
            if self.step() == Progress::Parked {
                core::hint::spin_loop();
            }
        }
    }

    /// Pops word `n` of the next job. Returns false without popping if the ingress FIFO is empty.
    fn pop(&mut self, n: usize) -> bool {
        if self.sp.puzzle_fifo_empty(D::INGRESS) {
            return false;
        }
        self.words[n] = self.sp.puzzle_fifo_pop(D::INGRESS);
        true
    }

    /// Pushes word `n` of the current job. Returns false without pushing if the egress FIFO is
    /// full.
    fn push(&mut self, n: usize) -> bool {
        if self.sp.puzzle_fifo_full(D::EGRESS) {
            return false;
        }
        self.sp.puzzle_fifo_push(D::EGRESS, self.words[n]);
        true
    }

    fn read_config(&mut self) {
        if let Err(err) = self.sp.set_caching() {
            warn!("Failed to configure caching: {err}");
        }
        let caching = self.sp.caching();
        info!("----");
        info!("Fetching private caching configuration.");
        info!(
            "I/O Caching: {:#x}/{}",
            caching.io_axcache,
            FormatBinary {
                value: caching.io_axcache,
                n: 4
            }
        );
        info!(
            "DMA Caching: {:#x}/{}",
            caching.dma_axcache,
            FormatBinary {
                value: caching.dma_axcache,
                n: 4
            }
        );

        info!("----");
        info!("Fetching private DMA configuration.");
        let config = self.sp.load_config();
        info!(
            "{} data FIFO:\n  Width: {:10}\n  Size : {:10}",
            D::NAME,
            config.data_fifo_width,
            config.data_fifo_size
        );
        self.config = Some(config);
    }
}

/// Logs the start-up banner of a firmware image.
pub fn log_banner<D: Direction>(core: CoreInfo) {
    info!("----");
    info!(
        "Stream Processor/GEM {} AOHW24 firmware version {}",
        D::NAME,
        env!("CARGO_PKG_VERSION")
    );
    info!("Running on core={}", core.index);
    info!("----");
    info!("Waiting for start signal.");
}
