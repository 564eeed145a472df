use clap::Parser;
use gridseq::{Event, EventList, Field, Simulation};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridseq")]
#[command(version = "0.1.0")]
#[command(about = "Grid sequencer tick runner", long_about = None)]
struct Args {
    /// Input grid file
    input: PathBuf,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 16)]
    ticks: usize,

    /// Seed for the deterministic random operators
    #[arg(short, long, default_value_t = 0)]
    seed: usize,

    /// Emit events as JSON, one tick per line
    #[arg(long)]
    json: bool,

    /// Print the final grid instead of events
    #[arg(long)]
    grid: bool,
}

/// One tick's worth of output for the JSON dump.
#[derive(Debug, Serialize)]
struct TickJson<'a> {
    tick: usize,
    events: &'a [Event],
}

fn main() -> Result<(), gridseq::Error> {
    env_logger::init();
    let args = Args::parse();

    let mut field = Field::load(&args.input)?;
    let mut marks = field.mark_buffer();
    let mut sim = Simulation::new(args.seed);
    let mut events = EventList::new();

    for tick in 0..args.ticks {
        sim.run(&mut field, &mut marks, tick, &mut events);
        if !args.grid {
            print_tick(tick, &events, args.json);
        }
        events.clear();
    }

    if args.grid {
        print!("{}", field.to_text());
    }

    Ok(())
}

fn print_tick(tick: usize, events: &EventList, json: bool) {
    if json {
        let line = TickJson {
            tick,
            events: events.as_slice(),
        };
        match serde_json::to_string(&line) {
            Ok(text) => println!("{}", text),
            Err(err) => log::error!("tick {}: {}", tick, err),
        }
    } else {
        for event in events.iter() {
            match event {
                Event::Note {
                    channel,
                    octave,
                    note,
                    velocity,
                    duration,
                    mono,
                } => println!(
                    "{:>5} note ch={} oct={} note={} vel={} len={}{}",
                    tick,
                    channel,
                    octave,
                    note,
                    velocity,
                    duration,
                    if *mono { " mono" } else { "" }
                ),
                Event::Cc {
                    channel,
                    control,
                    value,
                } => println!("{:>5} cc ch={} ctl={} val={}", tick, channel, control, value),
                Event::PitchBend { channel, msb, lsb } => {
                    println!("{:>5} pb ch={} msb={} lsb={}", tick, channel, msb, lsb)
                }
            }
        }
    }
}
