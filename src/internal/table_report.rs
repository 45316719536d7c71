#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use plotters::prelude::*;
use primehash::{AdditiveHasher, ChainedMap, HashTable, OpenAddressingMap, PositionalHasher};
use rand::{Rng, distr::Alphanumeric};

// Number of random keys inserted into every table
const NUM_KEYS: usize = 2_000;
// Print a report line every this many inserts
const CHECKPOINT: usize = 250;
// Same starting size for all tables so the curves are comparable
const INITIAL_CAPACITY: usize = 53;
const KEY_LENGTH: usize = 6;

// Table state after some number of inserts
struct Sample {
    inserted: usize,
    empty_buckets: usize,
    table_load: f64,
    size: usize,
    capacity: usize,
}

impl Sample {
    fn of(table: &dyn HashTable<usize>, inserted: usize) -> Self {
        Self {
            inserted,
            empty_buckets: table.empty_buckets(),
            table_load: table.table_load(),
            size: table.len(),
            capacity: table.capacity(),
        }
    }

    fn empty_ratio(&self) -> f64 {
        self.empty_buckets as f64 / self.capacity as f64
    }
}

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            // short keys collide often under the additive hash, which is what we want to see
            let len = rng.random_range(1..=KEY_LENGTH);
            (&mut rng).sample_iter(&Alphanumeric).take(len).map(char::from).collect::<String>()
        })
        .collect()
}

// Inserts every key, recording the table state after each insert
fn fill(table: &mut dyn HashTable<usize>, keys: &[String]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        table.put(key.clone(), i);
        samples.push(Sample::of(table, i + 1));
    }
    samples
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let keys = random_keys(NUM_KEYS);

    let mut tables: Vec<(&str, Box<dyn HashTable<usize>>)> = vec![
        (
            "Open addressing, additive hash",
            Box::new(OpenAddressingMap::<usize, _>::with_capacity_and_hasher(INITIAL_CAPACITY, AdditiveHasher)),
        ),
        (
            "Open addressing, positional hash",
            Box::new(OpenAddressingMap::<usize, _>::with_capacity_and_hasher(INITIAL_CAPACITY, PositionalHasher)),
        ),
        (
            "Chaining, additive hash",
            Box::new(ChainedMap::<usize, _>::with_capacity_and_hasher(INITIAL_CAPACITY, AdditiveHasher)),
        ),
        (
            "Chaining, positional hash",
            Box::new(ChainedMap::<usize, _>::with_capacity_and_hasher(INITIAL_CAPACITY, PositionalHasher)),
        ),
    ];

    let mut results = Vec::with_capacity(tables.len());
    for (name, table) in &mut tables {
        let samples = fill(table.as_mut(), &keys);

        println!("\n{name}");
        println!("{:>8} {:>8} {:>8} {:>8} {:>8}", "inserted", "empty", "load", "size", "capacity");
        for sample in samples.iter().filter(|s| s.inserted % CHECKPOINT == 0) {
            println!(
                "{:>8} {:>8} {:>8.2} {:>8} {:>8}",
                sample.inserted, sample.empty_buckets, sample.table_load, sample.size, sample.capacity
            );
        }

        results.push((*name, samples));
    }

    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50),  // Bright red
        RGBColor(50, 90, 220),  // Bright blue
        RGBColor(50, 180, 50),  // Bright green
        RGBColor(180, 50, 180), // Bright magenta
    ];

    let root = BitMapBackend::new("empty_buckets.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Share of Empty Buckets While Filling", (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..NUM_KEYS, 0.0..1.0)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Empty Buckets / Capacity")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (index, (name, samples)) in results.iter().enumerate() {
        let color = &colors[index % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(
                samples.iter().map(|s| (s.inserted, s.empty_ratio())),
                line_style,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    println!("\nGenerated plot image: empty_buckets.png");

    Ok(())
}
