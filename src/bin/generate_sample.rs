use std::collections::BTreeSet;

use serde::Serialize;

/// One row in the layout of the published occupancy CSV.
#[derive(Serialize)]
struct Row<'a> {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "Belegungsjahr")]
    year: i32,
    #[serde(rename = "Quartiersgruppe Name")]
    neighborhood: &'a str,
    #[serde(rename = "WGM")]
    rooms: &'a str,
    #[serde(rename = "Anz_Erw")]
    adults: u32,
    #[serde(rename = "Anz_Kinder")]
    children: u32,
    #[serde(rename = "Dichte")]
    density: f64,
    #[serde(rename = "Wechsel")]
    turnover: u8,
    #[serde(rename = "Ueberbelegung")]
    overcrowded: u8,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u32) -> u32 {
        (self.next_f64() * f64::from(n)) as u32
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const NEIGHBORHOODS: [&str; 6] = [
    "Centrum",
    "Ost",
    "West",
    "Nord",
    "Süd",
    "St. Fiden, Neudorf",
];

/// Room bucket label and the number of rooms used for the density.
const BUCKETS: [(&str, u32); 6] = [("1", 1), ("2", 2), ("3", 3), ("4", 4), ("5", 5), ("6+", 6)];

/// All sample rows for a given generator state.
fn sample_rows(rng: &mut SimpleRng) -> Vec<Row<'static>> {
    let mut rows = Vec::new();
    let mut unit_id: u32 = 1000;
    for (h, &neighborhood) in NEIGHBORHOODS.iter().enumerate() {
        for &(rooms_label, rooms) in &BUCKETS {
            // Fewer large flats, and fewer in the city centre.
            let units = 3 + (6 - rooms) * 2 + if h == 0 { 0 } else { 4 };
            for _ in 0..units {
                unit_id += 1;
                let first_year = 2011 + rng.below(9) as i32;
                // Some units are observed again in a later year.
                let observations = if rng.chance(0.3) { 2 } else { 1 };
                for k in 0..observations {
                    let year = (first_year + k * (1 + rng.below(3) as i32)).min(2019);
                    let adults = 1 + rng.below(rooms.min(3));
                    // Up to rooms + 1 children, so large families can
                    // exceed rooms + 2 persons.
                    let children = if rooms >= 2 { rng.below(rooms + 2) } else { 0 };
                    let persons = adults + children;
                    rows.push(Row {
                        id: unit_id,
                        year,
                        neighborhood,
                        rooms: rooms_label,
                        adults,
                        children,
                        density: (f64::from(adults) + 0.5 * f64::from(children)) / f64::from(rooms),
                        turnover: u8::from(k > 0 || rng.chance(0.2)),
                        overcrowded: u8::from(persons > rooms + 2),
                    });
                }
            }
        }
    }
    rows
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "assets/df.csv";
    std::fs::create_dir_all("assets")?;
    let mut writer = csv::Writer::from_path(output_path)?;

    let rows = sample_rows(&mut rng);
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let units: BTreeSet<u32> = rows.iter().map(|r| r.id).collect();
    println!("Wrote {} rows ({} units) to {output_path}", rows.len(), units.len());
    Ok(())
}
