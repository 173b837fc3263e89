//! Demo source sending a moving test pattern on one universe.
//!
//! Multicast to the universe's group:
//!     cargo run --example demo_src -- 1
//! Unicast to a node, verbose:
//!     cargo run --example demo_src -- 1 --host 192.168.0.20 -vv

mod error;

use std::{net::SocketAddr, thread::sleep, time::Duration};

use clap::Parser;
use sacn_tx::{
    config::{MulticastInterface, SenderConfig},
    e131_definitions::{ACN_SDT_MULTICAST_PORT, DMX_MAX_SLOTS},
    priority::Priority,
    sender::{Destination, Sender},
    universe_id::UniverseId,
};
use tracing::{Level, info};

use crate::error::ExampleResult;

#[derive(Parser)]
struct Args {
    /// Universe to send on, 1 to 63999
    universe: u16,

    /// Send by unicast to this host instead of multicast
    #[clap(long)]
    host: Option<String>,

    #[clap(long, default_value_t = ACN_SDT_MULTICAST_PORT)]
    port: u16,

    #[clap(long, default_value_t = Priority::DEFAULT.get())]
    priority: u8,

    #[clap(long, default_value = "sacn-tx demo")]
    name: String,

    /// Local address, bind to [::]:0 for IPv6
    #[clap(long, default_value = "0.0.0.0:0")]
    bind: SocketAddr,

    /// Multicast interface index
    #[clap(long)]
    interface: Option<u32>,

    /// Number of frames to send
    #[clap(long, default_value_t = 440)]
    frames: u32,

    /// Number of slots per frame
    #[clap(long, default_value_t = DMX_MAX_SLOTS as u16)]
    slots: u16,

    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExampleResult<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).try_init().ok();

    let universe = UniverseId::new(args.universe)?;
    let priority = Priority::new(args.priority)?;

    let mut config = SenderConfig::new(&args.name)
        .with_port(args.port)
        .with_bind_addr(args.bind)
        .with_default_priority(priority);
    if let Some(index) = args.interface {
        config = config.with_multicast_interface(MulticastInterface::Index(index));
    }

    let sender = Sender::new(config)?;
    let destination = match &args.host {
        Some(host) => Destination::Unicast(host),
        None => Destination::Multicast,
    };

    info!(cid = %sender.identity().cid(), %universe, ?destination, "sending {} frames", args.frames);

    let mut slots = vec![0u8; usize::from(args.slots)];
    for frame in 0..args.frames {
        for (i, slot) in slots.iter_mut().enumerate() {
            *slot = (frame as usize + i) as u8;
        }

        sender.send(destination, universe, &slots, None)?;

        // ~44 frames per second, the DMX512 refresh rate for a full universe.
        sleep(Duration::from_millis(23));
    }

    info!(next_sequence = sender.next_sequence(universe), "done");
    sender.close();

    Ok(())
}
