use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use structopt::StructOpt;

use std::time;

use otree::{Balance, Natural, OMap};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "dels", default_value = "0")]
    dels: usize,

    #[structopt(long = "avl")] // default red/black
    avl: bool,
}

fn main() {
    let opts = Opt::from_args();
    let seed = opts.seed.unwrap_or_else(random);
    println!("perf seed {}", seed);

    if opts.avl {
        run::<otree::Avl>("avl", seed, opts);
    } else {
        run::<otree::Rb>("rb", seed, opts);
    }
}

fn run<B: Balance>(name: &str, seed: u64, opts: Opt) {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: OMap<u64, u64, Natural, B> = OMap::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        let (key, val): (u64, u64) = (rng.gen(), rng.gen());
        index.set(key, val);
    }
    println!("{} loaded {} items in {:?}", name, opts.loads, start.elapsed());

    let start = time::Instant::now();
    for _i in 0..opts.gets {
        index.get(&rng.gen::<u64>());
    }
    if opts.gets > 0 {
        println!("{} {} gets in {:?}", name, opts.gets, start.elapsed());
    }

    let start = time::Instant::now();
    for _i in 0..opts.dels {
        index.remove(&rng.gen::<u64>());
    }
    if opts.dels > 0 {
        println!("{} {} dels in {:?}", name, opts.dels, start.elapsed());
    }

    index.validate().unwrap();
    println!("{} validated, len:{}", name, index.len());
}
