use embassy_futures::{block_on, join::join4};
use embassy_time::{with_timeout, Duration};
use telenode::{
    config::NodeConfig,
    hal::{BusError, Channel, Frame, HardwareError, SendError},
    job::run,
    layout::{decode_bus_frames, BUS_FRAME_COUNT},
    InitError, Jobs, Node,
};
use telenode_sim::{Signal, SimAnalogFrontEnd, SimBus, SimInputs, SimRadio, SimThermometer};

const BASE: u32 = 0x76c;

type SimJobs<'a> = Jobs<'a, SimAnalogFrontEnd, SimThermometer, SimBus, SimRadio>;

struct Bench {
    inputs: SimInputs,
    thermometer: SimThermometer,
    bus: SimBus,
    radio: SimRadio,
}

impl Bench {
    fn new() -> Self {
        let inputs = SimInputs::new();
        let channel = |number| Channel::new(number).unwrap();
        // Charge cooler inlet, exhaust back pressure, crank case, oil.
        inputs.set(channel(0), Signal::Steady(500));
        inputs.set(channel(1), Signal::Steady(4500));
        inputs.set(channel(2), Signal::Steady(400));
        inputs.set(channel(3), Signal::Steady(4500));
        // Charge cooler water temperature; the air temperature sensor is missing.
        inputs.set(channel(8), Signal::Steady(2500));

        Self {
            inputs,
            thermometer: SimThermometer::new(45),
            bus: SimBus::new(),
            radio: SimRadio::new(),
        }
    }

    fn start<'a>(&self, node: &'a Node) -> Result<SimJobs<'a>, InitError> {
        block_on(node.start(
            SimAnalogFrontEnd::new(self.inputs.clone(), 1),
            self.thermometer.clone(),
            self.bus.clone(),
            self.radio.clone(),
        ))
    }
}

fn run_for(jobs: SimJobs<'_>, duration: Duration) {
    let Jobs {
        acquisition,
        derivation,
        bus,
        wireless,
    } = jobs;
    let all = join4(run(acquisition), run(derivation), run(bus), run(wireless));
    assert!(block_on(with_timeout(duration, all)).is_err());
}

#[test]
fn node_publishes_on_both_links() {
    let node = Node::new(NodeConfig::DEFAULT);
    let bench = Bench::new();
    let jobs = bench.start(&node).unwrap();
    assert!(bench.bus.is_started());

    run_for(jobs, Duration::from_millis(1000));

    let frames = bench.bus.frames().values();
    assert!(frames.len() >= 2 * BUS_FRAME_COUNT, "{} frames", frames.len());
    assert!(frames
        .iter()
        .all(|frame| (BASE..BASE + 5).contains(&frame.identifier)));

    let telemetry = decode_bus_frames(BASE, &frames).unwrap();
    assert_eq!(telemetry.cpu_celsius, 45);
    assert_eq!(
        telemetry.voltages,
        [500, 4500, 400, 4500, 0, 0, 0, 0, 2500, 0]
    );
    // 21 °C, faulty sensor, no thermistor on channel 7.
    assert_eq!(telemetry.temperatures, [21, -128, 0]);
    assert_eq!(telemetry.pressures, [6575, 3000, 2000, 689]);

    let datagrams = bench.radio.datagrams().values();
    assert!(datagrams.len() >= 10, "{} datagrams", datagrams.len());
    let (peer, datagram) = datagrams.last().unwrap();
    assert_eq!(*peer, NodeConfig::DEFAULT.wireless.peer);
    assert_eq!(
        Frame::from_datagram(datagram),
        Some(Frame::new(BASE, [0xf4, 0x01, 0, 0, 0, 0, 0, 0]))
    );
}

#[test]
fn bus_frames_follow_the_cycle_timing() {
    let node = Node::new(NodeConfig::DEFAULT);
    let bench = Bench::new();
    let jobs = bench.start(&node).unwrap();

    run_for(jobs, Duration::from_millis(500));

    let records = bench.bus.frames().records();
    let cycle_starts: Vec<_> = records
        .iter()
        .filter(|record| record.value.identifier == BASE)
        .map(|record| record.at)
        .collect();
    assert!(cycle_starts.len() >= 3);

    for pair in cycle_starts.windows(2) {
        let period = pair[1] - pair[0];
        // 4 spacings of 10 ms, then 60 ms idle.
        assert!(period >= Duration::from_millis(100), "{period:?}");
    }
}

#[test]
fn bus_startup_failure_is_fatal() {
    let node = Node::new(NodeConfig::DEFAULT);
    let mut bench = Bench::new();
    bench.bus = SimBus::failing_start(BusError::Start);

    assert!(matches!(
        bench.start(&node),
        Err(InitError::Bus(BusError::Start))
    ));
}

#[test]
fn faults_only_affect_their_own_fields() {
    let node = Node::new(NodeConfig::DEFAULT);
    let bench = Bench::new();
    let jobs = bench.start(&node).unwrap();

    bench.thermometer.set(Err(HardwareError::Unavailable));
    bench
        .inputs
        .set(Channel::new(1).unwrap(), Signal::Failing(HardwareError::Timeout));
    bench.radio.set_failure(Some(SendError::Other));

    run_for(jobs, Duration::from_millis(700));

    let telemetry = decode_bus_frames(BASE, &bench.bus.frames().values()).unwrap();
    assert_eq!(telemetry.cpu_celsius, -128);
    assert_eq!(
        telemetry.voltages,
        [500, 0, 400, 4500, 0, 0, 0, 0, 2500, 0]
    );
    assert_eq!(telemetry.pressures, [6575, 0, 2000, 689]);
    assert!(bench.radio.datagrams().is_empty());
}

#[test]
fn blocked_bus_does_not_stall_the_radio() {
    let node = Node::new(NodeConfig::DEFAULT);
    let bench = Bench::new();
    let jobs = bench.start(&node).unwrap();

    bench.bus.set_blocked(true);
    run_for(jobs, Duration::from_millis(500));

    assert!(bench.bus.frames().is_empty());
    assert!(bench.radio.datagrams().len() >= 5);
}
