/*!
 * End-to-end tests of the batch generator with mock and real encoders
 */

use anyhow::Result;
use image::GenericImageView;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use qrbatch::app_config::GenerationConfig;
use qrbatch::encoder::{MockEncoder, QrCodeEncoder};
use qrbatch::errors::{GeneratorError, RecordError};
use qrbatch::generation::BatchGenerator;
use crate::common;

#[test]
fn test_generate_withSampleRecords_shouldAttemptEachRecordOnce() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let encoder = Arc::new(MockEncoder::working());
    let generator = common::default_generator(encoder.clone());

    let report = generator.generate_report(common::SAMPLE_RECORDS, &folder, ".png")?;

    let attempts: HashSet<(String, PathBuf)> = encoder
        .attempts()
        .into_iter()
        .map(|a| (a.payload, a.destination))
        .collect();
    let out = PathBuf::from(&folder);
    let expected: HashSet<(String, PathBuf)> = [
        ("123".to_string(), out.join("alice.png")),
        ("456".to_string(), out.join("bob.png")),
        ("carol".to_string(), out.join("carol.png")),
    ]
    .into_iter()
    .collect();

    assert_eq!(encoder.attempt_count(), 3);
    assert_eq!(attempts, expected);
    assert_eq!(report.total_jobs, 4);
    assert_eq!(report.blank_lines, 1);
    assert_eq!(report.written.len(), 3);
    assert!(report.failures.is_empty());
    assert_eq!(
        common::file_names(&out)?,
        vec!["alice.png".to_string(), "bob.png".to_string(), "carol.png".to_string()]
    );
    Ok(())
}

#[test]
fn test_generate_withEmptyFields_shouldReturnInvalidInputAndWriteNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let encoder = Arc::new(MockEncoder::working());
    let generator = common::default_generator(encoder.clone());

    let cases = [
        ("", folder.as_str(), ".png", "record list"),
        ("alice 123", "", ".png", "output folder"),
        ("alice 123", folder.as_str(), "", "file extension"),
    ];

    for (records, out, ext, expected_field) in cases {
        match generator.generate(records, out, ext) {
            Err(GeneratorError::InvalidInput { field }) => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    assert_eq!(encoder.attempt_count(), 0);
    assert!(!PathBuf::from(&folder).exists());
    Ok(())
}

#[test]
fn test_generate_withMalformedLine_shouldSkipItAndContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let encoder = Arc::new(MockEncoder::working());
    let generator = common::default_generator(encoder.clone());

    let report = generator.generate_report("a b c\nzed 9", &folder, ".png")?;

    assert_eq!(encoder.attempt_count(), 1);
    assert_eq!(report.malformed.len(), 1);
    assert_eq!(report.malformed[0].sequence_index, 0);
    assert!(matches!(report.malformed[0].error, RecordError::Malformed { tokens: 3, .. }));
    assert_eq!(common::file_names(&PathBuf::from(&folder))?, vec!["zed.png".to_string()]);
    Ok(())
}

#[test]
fn test_generate_withFailingEncoder_shouldListEveryRecordAndStillSummarize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let encoder = Arc::new(MockEncoder::failing());
    let generator = common::default_generator(encoder.clone());

    let report = generator.generate_report(&common::numbered_records(25), &folder, ".png")?;

    assert_eq!(report.failures.len(), 25);
    assert_eq!(encoder.attempt_count(), 25);
    assert!(report.written.is_empty());
    assert!(report.summary.contains(&folder));
    Ok(())
}

#[test]
fn test_generate_summary_withAndWithoutFailures_shouldBeIdentical() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");

    let ok = common::default_generator(Arc::new(MockEncoder::working()))
        .generate("alice 1", &folder, ".png")?;
    let failed = common::default_generator(Arc::new(MockEncoder::failing()))
        .generate("alice 1", &folder, ".png")?;

    assert_eq!(ok, failed);
    Ok(())
}

#[test]
fn test_generate_withEmptyFiles_shouldReportValidationFailures() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let generator = common::default_generator(Arc::new(MockEncoder::empty_file()));

    let report = generator.generate_report("a\nb", &folder, ".png")?;

    let failed: HashSet<PathBuf> = report.failures.paths().iter().cloned().collect();
    let out = PathBuf::from(&folder);
    assert_eq!(failed, [out.join("a.png"), out.join("b.png")].into_iter().collect());
    Ok(())
}

#[test]
fn test_generate_withIntermittentEncoder_shouldSplitWrittenAndFailed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "out");
    let generator = common::default_generator(Arc::new(MockEncoder::intermittent(3)));

    let report = generator.generate_report(&common::numbered_records(30), &folder, ".png")?;

    assert_eq!(report.failures.len(), 10);
    assert_eq!(report.written.len(), 20);
    assert_eq!(report.attempted(), 30);
    Ok(())
}

#[test]
fn test_generate_twice_withSameInput_shouldProduceSameFileNames() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let first = common::output_folder(&temp_dir, "first");
    let second = common::output_folder(&temp_dir, "second");
    let generator = common::default_generator(Arc::new(MockEncoder::working()));
    let records = common::numbered_records(40);

    generator.generate(&records, &first, ".png")?;
    generator.generate(&records, &second, ".png")?;

    assert_eq!(
        common::file_names(&PathBuf::from(first))?,
        common::file_names(&PathBuf::from(second))?
    );
    assert_eq!(generator.runs_completed(), 2);
    Ok(())
}

#[test]
fn test_generate_withFileBlockingFolder_shouldFailPreflightWhenStrict() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_records_file(temp_dir.path(), "out", "not a folder")?;
    let encoder = Arc::new(MockEncoder::working());
    let generator = common::default_generator(encoder.clone());

    let result = generator.generate("alice 1", &blocker.to_string_lossy(), ".png");

    assert!(matches!(result, Err(GeneratorError::OutputFolder { .. })));
    assert_eq!(encoder.attempt_count(), 0);
    Ok(())
}

#[test]
fn test_generate_withFileBlockingFolder_shouldAttemptRecordsWhenLenient() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let blocker = common::create_records_file(temp_dir.path(), "out", "not a folder")?;
    let encoder = Arc::new(MockEncoder::working());
    let config = GenerationConfig {
        strict_output_folder: false,
        ..GenerationConfig::default()
    };
    let generator = common::mock_generator(encoder.clone(), config);

    let report = generator.generate_report("alice 1\nbob 2", &blocker.to_string_lossy(), ".png")?;

    assert_eq!(encoder.attempt_count(), 2);
    assert_eq!(report.failures.len(), 2);
    Ok(())
}

#[test]
fn test_generate_withRealEncoder_shouldWriteReadablePngs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "png");
    let config = GenerationConfig {
        pixel_size: 128,
        ..GenerationConfig::default()
    };
    let generator = BatchGenerator::new(Arc::new(QrCodeEncoder::new()), config)?;

    let report = generator.generate_report(common::SAMPLE_RECORDS, &folder, ".png")?;

    assert_eq!(report.written.len(), 3);
    for file in &report.written {
        assert!(file.bytes > 0);
        let image = image::open(&file.path)?;
        assert_eq!(image.dimensions(), (128, 128));
    }
    Ok(())
}

#[test]
fn test_generate_withRealEncoderAndOversizedPayload_shouldContainFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let folder = common::output_folder(&temp_dir, "png");
    let generator =
        BatchGenerator::new(Arc::new(QrCodeEncoder::new()), GenerationConfig::default())?;
    let records = format!("small ok\nhuge {}", "x".repeat(8000));

    let report = generator.generate_report(&records, &folder, ".png")?;

    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failures.paths(), &[PathBuf::from(&folder).join("huge.png")]);
    Ok(())
}

#[test]
fn test_new_withOversizedPixelSize_shouldRejectBeforeAnyRun() {
    let config = GenerationConfig {
        pixel_size: u32::MAX,
        ..GenerationConfig::default()
    };

    let result = BatchGenerator::new(Arc::new(QrCodeEncoder::new()), config);

    assert!(matches!(result, Err(GeneratorError::InvalidConfig { .. })));
}
