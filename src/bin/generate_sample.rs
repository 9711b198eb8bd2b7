use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// (drug, generic, condition, csa)
const CATALOG: &[(&str, &str, &str, &str)] = &[
    ("doxycycline", "doxycycline", "Acne", "N"),
    ("spironolactone", "spironolactone", "Acne", "N"),
    ("Accutane", "isotretinoin", "Acne", "N"),
    ("ibuprofen", "ibuprofen", "Pain", "N"),
    ("tramadol", "tramadol", "Pain", "4"),
    ("oxycodone", "oxycodone", "Pain", "2"),
    ("sertraline", "sertraline", "Depression", "N"),
    ("bupropion", "bupropion", "Depression", "N"),
    ("metformin", "metformin", "Diabetes, Type 2", "N"),
    ("Ozempic", "semaglutide", "Diabetes, Type 2", "N"),
    ("lisinopril", "lisinopril", "Hypertension", "N"),
    ("amlodipine", "amlodipine", "Hypertension", "N"),
    ("alprazolam", "alprazolam", "Anxiety", "4"),
    ("hydroxyzine", "hydroxyzine", "Anxiety", "N"),
    ("zolpidem", "zolpidem", "Insomnia", "4"),
    ("cetirizine", "cetirizine", "Allergies", "N"),
];

const SIDE_EFFECTS: &[&str] = &[
    "hives",
    "difficult breathing",
    "swelling of your face, lips, tongue, or throat",
    "nausea",
    "headache",
    "dizziness",
    "drowsiness",
    "dry mouth",
    "diarrhea",
    "stomach pain",
    "skin rash",
    "trouble sleeping",
];

#[derive(Debug, Serialize)]
struct SampleRow {
    drug_name: String,
    generic_name: String,
    medical_condition: String,
    side_effects: Option<String>,
    rating: Option<f64>,
    no_of_reviews: Option<i64>,
    csa: String,
    drug_link: Option<String>,
    medical_condition_url: Option<String>,
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn slug(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn generate_rows(rng: &mut SimpleRng, rows_per_drug: usize) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for _ in 0..rows_per_drug {
        for &(drug, generic, condition, csa) in CATALOG {
            let side_effects = (!rng.chance(0.05)).then(|| {
                let n = 2 + rng.below(5);
                (0..n)
                    .map(|_| SIDE_EFFECTS[rng.below(SIDE_EFFECTS.len())])
                    .collect::<Vec<_>>()
                    .join("; ")
            });
            let rating = (!rng.chance(0.1)).then(|| {
                let r = rng.gauss(6.8, 1.8).clamp(0.0, 10.0);
                (r * 10.0).round() / 10.0
            });
            let reviews = (!rng.chance(0.05)).then(|| (-rng.next_f64().max(1e-9).ln() * 150.0) as i64);
            let has_links = !rng.chance(0.1);

            rows.push(SampleRow {
                drug_name: drug.to_string(),
                generic_name: generic.to_string(),
                medical_condition: condition.to_string(),
                side_effects,
                rating,
                no_of_reviews: reviews,
                csa: csa.to_string(),
                drug_link: has_links.then(|| format!("https://www.drugs.com/{}.html", slug(drug))),
                medical_condition_url: has_links
                    .then(|| format!("https://www.drugs.com/condition/{}.html", slug(condition))),
            });
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let text = |f: fn(&SampleRow) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("drug_name", DataType::Utf8, true),
        Field::new("generic_name", DataType::Utf8, true),
        Field::new("medical_condition", DataType::Utf8, true),
        Field::new("side_effects", DataType::Utf8, true),
        Field::new("rating", DataType::Float64, true),
        Field::new("no_of_reviews", DataType::Int64, true),
        Field::new("csa", DataType::Utf8, true),
        Field::new("drug_link", DataType::Utf8, true),
        Field::new("medical_condition_url", DataType::Utf8, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| Some(r.drug_name.as_str())),
            text(|r| Some(r.generic_name.as_str())),
            text(|r| Some(r.medical_condition.as_str())),
            text(|r| r.side_effects.as_deref()),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.rating).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.no_of_reviews).collect::<Vec<_>>())),
            text(|r| Some(r.csa.as_str())),
            text(|r| r.drug_link.as_deref()),
            text(|r| r.medical_condition_url.as_deref()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng, 12);

    let dir = Path::new("data");
    std::fs::create_dir_all(dir).context("creating data directory")?;

    let csv_path = dir.join("cleaned_drugs_dashboard.csv");
    let parquet_path = dir.join("cleaned_drugs_dashboard.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} drug records ({} drugs) to {} and {}",
        rows.len(),
        CATALOG.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
