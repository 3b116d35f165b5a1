//! Write a handful of demo price lists with differing header layouts.
//!
//! Usage: `generate_sample [DIR]` (defaults to `./sample_prices`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Minimal deterministic PRNG (splitmix64) so every run writes the same data.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

/// One supplier file: name, header row and column order of (product, price, weight).
struct Layout {
    file: &'static str,
    headers: &'static [&'static str],
    order: [usize; 3],
}

const LAYOUTS: &[Layout] = &[
    Layout {
        file: "price_0.csv",
        headers: &["№", "товар", "цена", "вес"],
        order: [1, 2, 3],
    },
    Layout {
        file: "price_1.csv",
        headers: &["фасовка", "наименование", "розница", "склад"],
        order: [1, 2, 0],
    },
    Layout {
        file: "price_2.csv",
        headers: &["name", "weight", "price"],
        order: [0, 2, 1],
    },
    Layout {
        file: "supplier_price_3.csv",
        headers: &["продукт", "масса", "цена"],
        order: [0, 2, 1],
    },
];

const PRODUCTS: &[(&str, f64)] = &[
    ("Молоко", 90.0),
    ("Сметана", 180.0),
    ("Сыр твёрдый", 800.0),
    ("Хлеб ржаной", 110.0),
    ("Гречка", 120.0),
    ("Филе куриное", 420.0),
    ("Green tea", 900.0),
    ("Butter", 950.0),
];

const WEIGHTS: &[f64] = &[0.25, 0.5, 1.0, 2.0, 5.0];

fn write_layout(dir: &Path, layout: &Layout, rng: &mut SimpleRng) -> Result<usize> {
    let path = dir.join(layout.file);
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(layout.headers)?;

    let mut rows = 0;
    for &(name, base_price) in PRODUCTS {
        let weight = WEIGHTS[(rng.next_u64() % WEIGHTS.len() as u64) as usize];
        let price = (base_price * weight * rng.range(0.8, 1.25)).round();

        let mut row = vec![String::new(); layout.headers.len()];
        // filler for columns that are neither product, price nor weight
        for (i, cell) in row.iter_mut().enumerate() {
            if !layout.order.contains(&i) {
                *cell = (rng.next_u64() % 500).to_string();
            }
        }
        row[layout.order[0]] = name.to_string();
        row[layout.order[1]] = price.to_string();
        row[layout.order[2]] = weight.to_string();
        writer.write_record(&row)?;
        rows += 1;
    }
    // a malformed row the loader is expected to skip
    let mut bad = vec!["n/a".to_string(); layout.headers.len()];
    bad[layout.order[0]] = "Broken line".to_string();
    writer.write_record(&bad)?;

    writer.flush()?;
    Ok(rows)
}

fn main() -> Result<()> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_prices"));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let mut total = 0;
    for layout in LAYOUTS {
        total += write_layout(&dir, layout, &mut rng)?;
    }

    println!(
        "Wrote {total} products across {} price lists to {}",
        LAYOUTS.len(),
        dir.display()
    );
    Ok(())
}
