use prism::cookie::{ChecksumEncoding, RxFlags, TxFlags};
use prism::example_data::{
    RX_BROADCAST_WRAP_COOKIE, RX_SOF_EOF_COOKIE, TX_EOF_WRAP_COOKIE, TX_NOCRC_COOKIE,
};
use prism::insn::FifoId;
use prism::pipeline::{Progress, RxPipeline, State, TxPipeline};
use prism::regs::Reg;
use prism::sim::SimSp;
use prism::sp::StreamProcessor;

fn enabled_sim() -> SimSp {
    let mut sim = SimSp::new();
    sim.set_reg(Reg::Control, 1);
    sim.set_reg(Reg::DataFifoSize, 2048);
    sim.set_reg(Reg::DataFifoWidth, 64);
    sim
}

/// Returns an RX pipeline that has passed start-up and is waiting for its first job.
fn started_rx() -> RxPipeline<SimSp> {
    let mut pipeline = RxPipeline::new(StreamProcessor::new(enabled_sim()));
    pipeline.step_until_parked();
    assert_eq!(pipeline.state(), State::PollIngress);
    pipeline
}

fn started_tx() -> TxPipeline<SimSp> {
    let mut pipeline = TxPipeline::new(StreamProcessor::new(enabled_sim()));
    pipeline.step_until_parked();
    assert_eq!(pipeline.state(), State::PollIngress);
    pipeline
}

fn sim(pipeline: &RxPipeline<SimSp>) -> &SimSp {
    pipeline.sp().transport()
}

// Tests that a single-buffer frame is decoded and forwarded unchanged from FIFO 1 to FIFO 2.
#[test]
fn rx_forwards_job_unchanged() {
    let mut pipeline = started_rx();
    pipeline
        .sp_mut()
        .transport_mut()
        .feed(FifoId::Fifo1, &RX_SOF_EOF_COOKIE);
    pipeline.step_until_parked();

    let job = pipeline.last_job().copied().unwrap();
    assert_eq!(job.size, 6);
    assert_eq!(
        job.flags,
        RxFlags {
            sof: true,
            eof: true,
            ..Default::default()
        }
    );
    assert_eq!(pipeline.jobs_processed(), 1);
    assert_eq!(
        sim(&pipeline).queued(FifoId::Fifo2).collect::<Vec<_>>(),
        RX_SOF_EOF_COOKIE
    );
    assert_eq!(sim(&pipeline).queued_len(FifoId::Fifo1), 0);
    assert_eq!(sim(&pipeline).underflows(), 0);
    assert_eq!(sim(&pipeline).overflows(), 0);
}

#[test]
fn tx_decodes_nocrc() {
    let mut pipeline = started_tx();
    pipeline
        .sp_mut()
        .transport_mut()
        .feed(FifoId::Fifo0, &TX_NOCRC_COOKIE);
    pipeline.step_until_parked();

    let job = pipeline.last_job().copied().unwrap();
    assert_eq!(
        job.flags,
        TxFlags {
            wrap: false,
            eof: false,
            nocrc: true
        }
    );
    assert_eq!(job.size, 64);
    let sim = pipeline.sp().transport();
    assert_eq!(sim.queued(FifoId::Fifo1).collect::<Vec<_>>(), TX_NOCRC_COOKIE);
}

// Tests that a partially available job leaves the pipeline parked without consuming more than is
// there, and that it resumes once the rest arrives.
#[test]
fn partial_job_parks() {
    let mut pipeline = started_rx();
    pipeline
        .sp_mut()
        .transport_mut()
        .feed(FifoId::Fifo1, &RX_SOF_EOF_COOKIE[..2]);

    assert_eq!(pipeline.step_until_parked(), 2);
    assert_eq!(pipeline.state(), State::Drain(2));
    for _ in 0..100 {
        assert_eq!(pipeline.step(), Progress::Parked);
    }
    assert_eq!(pipeline.state(), State::Drain(2));
    assert_eq!(pipeline.jobs_processed(), 0);
    assert!(pipeline.last_job().is_none());
    assert_eq!(sim(&pipeline).pops(FifoId::Fifo1), 2);
    assert_eq!(sim(&pipeline).pushes(FifoId::Fifo2), 0);
    assert_eq!(sim(&pipeline).underflows(), 0);

    pipeline
        .sp_mut()
        .transport_mut()
        .feed(FifoId::Fifo1, &RX_SOF_EOF_COOKIE[2..]);
    pipeline.step_until_parked();
    assert_eq!(pipeline.jobs_processed(), 1);
    assert_eq!(
        sim(&pipeline).queued(FifoId::Fifo2).collect::<Vec<_>>(),
        RX_SOF_EOF_COOKIE
    );
}

#[test]
fn consecutive_jobs_keep_their_order() {
    let mut pipeline = started_rx();
    let sim_mut = pipeline.sp_mut().transport_mut();
    sim_mut.feed(FifoId::Fifo1, &RX_SOF_EOF_COOKIE);
    sim_mut.feed(FifoId::Fifo1, &RX_BROADCAST_WRAP_COOKIE);
    pipeline.step_until_parked();

    assert_eq!(pipeline.jobs_processed(), 2);
    let last = pipeline.last_job().copied().unwrap();
    assert!(last.flags.wrap && last.flags.broadcast);
    assert_eq!(last.flags.checksum, ChecksumEncoding::Ip);

    let forwarded: Vec<u32> = sim(&pipeline).queued(FifoId::Fifo2).collect();
    assert_eq!(forwarded[..4], RX_SOF_EOF_COOKIE);
    assert_eq!(forwarded[4..], RX_BROADCAST_WRAP_COOKIE);
}

// Tests that a full egress FIFO holds the job back, word by word, until there is room.
#[test]
fn full_egress_parks() {
    let mut pipeline = started_tx();
    let sim_mut = pipeline.sp_mut().transport_mut();
    sim_mut.set_capacity(FifoId::Fifo1, 2);
    sim_mut.feed(FifoId::Fifo0, &TX_EOF_WRAP_COOKIE);
    pipeline.step_until_parked();

    // The job was traced before the pipeline got stuck on the third word.
    assert_eq!(pipeline.jobs_processed(), 1);
    assert_eq!(pipeline.state(), State::Forward(2));
    assert_eq!(pipeline.step(), Progress::Parked);

    let sim_mut = pipeline.sp_mut().transport_mut();
    assert_eq!(sim_mut.take(FifoId::Fifo1), Some(TX_EOF_WRAP_COOKIE[0]));
    assert_eq!(sim_mut.take(FifoId::Fifo1), Some(TX_EOF_WRAP_COOKIE[1]));
    pipeline.step_until_parked();
    assert_eq!(pipeline.state(), State::PollIngress);

    let sim = pipeline.sp().transport();
    assert_eq!(sim.overflows(), 0);
    assert_eq!(
        sim.queued(FifoId::Fifo1).collect::<Vec<_>>(),
        TX_EOF_WRAP_COOKIE[2..]
    );
}

// Tests that bits outside of every cookie field are still forwarded.
#[test]
fn undefined_bits_are_forwarded() {
    let words = [0x0000_0001, 0x0000_0203, 0x0006_0004, 0xffff_c003];
    let mut pipeline = started_rx();
    pipeline
        .sp_mut()
        .transport_mut()
        .feed(FifoId::Fifo1, &words);
    pipeline.step_until_parked();
    assert_eq!(
        sim(&pipeline).queued(FifoId::Fifo2).collect::<Vec<_>>(),
        words
    );
}

#[test]
fn start_up_reads_config_once() {
    let mut pipeline = RxPipeline::new(StreamProcessor::new(SimSp::new()));
    assert_eq!(pipeline.step_until_parked(), 0);
    assert_eq!(pipeline.state(), State::WaitEnable);

    let sim_mut = pipeline.sp_mut().transport_mut();
    sim_mut.set_reg(Reg::DataFifoSize, 8192);
    sim_mut.set_reg(Reg::DataFifoWidth, 128);
    sim_mut.set_reg(Reg::Control, 1);
    pipeline.step_until_parked();
    assert_eq!(pipeline.config().map(|c| c.data_fifo_size), Some(8192));

    // Later register changes are not picked up, and the enable bit is never checked again.
    let sim_mut = pipeline.sp_mut().transport_mut();
    sim_mut.set_reg(Reg::DataFifoSize, 1);
    sim_mut.set_reg(Reg::Control, 0);
    sim_mut.feed(FifoId::Fifo1, &RX_SOF_EOF_COOKIE);
    pipeline.step_until_parked();
    assert_eq!(pipeline.config().map(|c| c.data_fifo_size), Some(8192));
    assert_eq!(pipeline.jobs_processed(), 1);
    assert_eq!(sim(&pipeline).stores(), 2);
}
