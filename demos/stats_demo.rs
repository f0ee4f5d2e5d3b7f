use chain_hash::DefaultHashTable;
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "count", default_value_t = 100_000)]
    count: usize,
}

/// Formats 128 random bits as a UUID-shaped string.
fn random_key(rng: &mut SmallRng) -> String {
    let bits: u128 = rng.random();
    let hex = format!("{:032x}", bits);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn main() {
    let args = Args::parse();
    let mut rng = SmallRng::from_os_rng();

    println!("Inserting {} random keys...", args.count);

    let mut table: DefaultHashTable<String, usize> = DefaultHashTable::new();
    let mut duplicates = 0;
    for i in 0..args.count {
        if table.add(random_key(&mut rng), i).is_duplicate() {
            duplicates += 1;
        }
    }

    println!("Inserted {} keys ({} duplicates ignored)", table.len(), duplicates);
    println!("Colliding buckets: {}", table.collisions());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    let histogram = table.chain_histogram();
    for (length, buckets) in histogram.iter().enumerate() {
        println!("{:>3} | {}", length, buckets);
    }
    table.debug_stats().print();
}
