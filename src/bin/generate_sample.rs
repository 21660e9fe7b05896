use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use serde::Serialize;

const FIRST_NAMES: [&str; 12] = [
    "Alice", "Ben", "Chloe", "Daniel", "Emma", "Felix", "Grace", "Hugo", "Iris", "Jammy", "Kate",
    "Leo",
];
const CLASSES: [&str; 3] = ["A", "B", "C"];
const STUDENTS: usize = 30;

#[derive(Debug, Serialize)]
struct Student {
    name: String,
    score: i64,
    class: &'static str,
}

/// A deterministic class: normally distributed scores clamped to 0–100.
fn generate_students(seed: u64) -> Result<Vec<Student>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(70.0, 14.0).context("building score distribution")?;

    Ok((0..STUDENTS)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let initial = char::from(b'A' + (i / FIRST_NAMES.len()) as u8);
            let score: f64 = rng.sample(normal);
            Student {
                name: format!("{first} {initial}."),
                score: score.round().clamp(0.0, 100.0) as i64,
                class: CLASSES[i % CLASSES.len()],
            }
        })
        .collect())
}

fn write_csv(path: &str, students: &[Student]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for student in students {
        writer.serialize(student).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_json(path: &str, students: &[Student]) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    serde_json::to_writer_pretty(file, students).context("writing JSON")?;
    Ok(())
}

fn write_parquet(path: &str, students: &[Student]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("score", DataType::Int64, false),
        Field::new("class", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(
                students.iter().map(|s| s.name.as_str()),
            )),
            Arc::new(Int64Array::from_iter_values(students.iter().map(|s| s.score))),
            Arc::new(StringArray::from_iter_values(students.iter().map(|s| s.class))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let students = generate_students(42)?;

    write_csv("sample_scores.csv", &students)?;
    write_json("sample_scores.json", &students)?;
    write_parquet("sample_scores.parquet", &students)?;

    println!(
        "Wrote {} students to sample_scores.{{csv,json,parquet}}",
        students.len()
    );
    Ok(())
}
