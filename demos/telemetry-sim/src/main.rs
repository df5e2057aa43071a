//! Runs a telemetry node on simulated hardware.
//!
//! Acquisition and derivation run on one executor, the transmitters on another one in a
//! separate thread, like on a dual-core target. The decoded bus telemetry is printed every
//! second; set `TELENODE_LOGLEVEL=debug` to also see every frame.

mod logger;

use std::thread;

use embassy_executor::Executor;
use embassy_time::{Duration, Timer};
use log::{error, info};
use static_cell::StaticCell;
use telenode::{
    acquisition::Acquisition,
    bus::BusTransmitter,
    config::NodeConfig,
    convert::{MeasurementUnit, PRESSURE_SCALING},
    derivation::Derivation,
    hal::{Channel, Frame},
    job::run,
    layout::decode_bus_frames,
    wireless::WirelessTransmitter,
    Jobs, Node,
};
use telenode_sim::{
    Recorder, Signal, SimAnalogFrontEnd, SimBus, SimInputs, SimRadio, SimThermometer,
};

static NODE: Node = Node::new(NodeConfig::DEFAULT);

static ACQUISITION_EXECUTOR: StaticCell<Executor> = StaticCell::new();
static TRANSMISSION_EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[embassy_executor::task]
async fn acquisition_task(job: Acquisition<'static, SimAnalogFrontEnd>) {
    run(job).await
}

#[embassy_executor::task]
async fn derivation_task(job: Derivation<'static>) {
    run(job).await
}

#[embassy_executor::task]
async fn bus_task(job: BusTransmitter<'static, SimBus, SimThermometer>) {
    run(job).await
}

#[embassy_executor::task]
async fn wireless_task(job: WirelessTransmitter<'static, SimRadio>) {
    run(job).await
}

/// Slowly varies the charge pressure, between idle and full boost.
#[embassy_executor::task]
async fn engine_task(inputs: SimInputs) {
    const BOOST: Channel = Channel::new_const(0);
    const IDLE_MV: u16 = 700;
    const FULL_BOOST_MV: u16 = 3900;
    const STEP_MV: u16 = 50;

    let mut v_mv = IDLE_MV;
    let mut rising = true;
    loop {
        inputs.set(
            BOOST,
            Signal::Noisy {
                v_mv,
                amplitude_mv: 15,
            },
        );

        if v_mv >= FULL_BOOST_MV {
            rising = false;
        } else if v_mv <= IDLE_MV {
            rising = true;
        }
        v_mv = if rising { v_mv + STEP_MV } else { v_mv - STEP_MV };

        Timer::after(Duration::from_millis(100)).await;
    }
}

/// Prints what a receiver on the bus would see.
#[embassy_executor::task]
async fn monitor_task(frames: Recorder<Frame>) {
    let config = NODE.config();
    loop {
        Timer::after(Duration::from_secs(1)).await;

        let received: Vec<Frame> = frames.take().into_iter().map(|record| record.value).collect();
        let Some(telemetry) = decode_bus_frames(config.bus.base_id, &received) else {
            info!("monitor: no complete bus cycle received");
            continue;
        };

        info!(
            "monitor: {} frames, cpu {} {celsius}, voltages {:?} {millivolt}, temperatures {:?} {celsius}",
            received.len(),
            telemetry.cpu_celsius,
            telemetry.voltages,
            telemetry.temperatures,
            celsius = MeasurementUnit::Celsius,
            millivolt = MeasurementUnit::Millivolt,
        );
        let divisor = 10u16.pow(u32::from(PRESSURE_SCALING.unsigned_abs()));
        for (pressure, channel) in telemetry.pressures.iter().zip(config.derivation.channels) {
            info!(
                "monitor: {} {}.{:02} {}",
                channel.source,
                pressure / divisor,
                pressure % divisor,
                channel.sensor.unit,
            );
        }
    }
}

fn inputs() -> SimInputs {
    let inputs = SimInputs::new();
    let set = |number, signal| inputs.set(Channel::new_const(number), signal);

    set(
        1,
        Signal::Noisy {
            v_mv: 1500,
            amplitude_mv: 30,
        },
    );
    // Ignition noise on the crank-case sensor.
    set(
        2,
        Signal::Spiky {
            v_mv: 1200,
            spike_mv: 4900,
            period: 7,
        },
    );
    set(
        3,
        Signal::Noisy {
            v_mv: 2900,
            amplitude_mv: 20,
        },
    );
    set(7, Signal::Steady(1800));
    set(8, Signal::Steady(1350));
    set(9, Signal::Steady(2750));
    inputs
}

fn main() {
    logger::init_logger_from_env();

    let inputs = inputs();
    let bus = SimBus::new();
    let frames = bus.frames().clone();

    let started = embassy_futures::block_on(NODE.start(
        SimAnalogFrontEnd::new(inputs.clone(), 0x5eed),
        SimThermometer::new(41),
        bus,
        SimRadio::new(),
    ));
    let Jobs {
        acquisition,
        derivation,
        bus,
        wireless,
    } = match started {
        Ok(jobs) => jobs,
        Err(err) => {
            error!("startup failed: {}", err);
            std::process::abort();
        }
    };

    thread::spawn(move || {
        let executor = TRANSMISSION_EXECUTOR.init(Executor::new());
        executor.run(|spawner| {
            spawner.must_spawn(bus_task(bus));
            spawner.must_spawn(wireless_task(wireless));
            spawner.must_spawn(monitor_task(frames));
        });
    });

    let executor = ACQUISITION_EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(acquisition_task(acquisition));
        spawner.must_spawn(derivation_task(derivation));
        spawner.must_spawn(engine_task(inputs));
    });
}
