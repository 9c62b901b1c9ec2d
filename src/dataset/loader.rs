use crate::dataset::combined_table::{CombinedTable, SkippedRegion, REGION_COLUMN};
use crate::dataset::error::DatasetError;
use crate::dataset::overrides::{OverrideSource, Overrides};
use crate::dataset::sampling::{sample_frame, DEFAULT_SEED};
use crate::dataset::timestamp::parse_timestamp_column;
use crate::regions::registry::RegionRegistry;
use crate::types::metric::Metric;
use bon::bon;
use log::{debug, info, warn};
use polars::prelude::*;
use std::io::Cursor;

/// Reads regional CSV datasets and merges them into a [`CombinedTable`].
///
/// Every region goes through the same steps: read (from an uploaded override or
/// from the registered file), cast metric columns to `Float64`, parse the
/// `Timestamp` column, optionally sample, tag with the region label.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    registry: RegionRegistry,
    seed: u64,
}

#[bon]
impl DatasetLoader {
    pub fn new(registry: RegionRegistry) -> Self {
        Self {
            registry,
            seed: DEFAULT_SEED,
        }
    }

    /// Uses `seed` instead of [`DEFAULT_SEED`] for row sampling.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Loads and concatenates the requested regions.
    ///
    /// # Arguments
    ///
    /// * `.regions(&[&str])`: **Required.** Region labels, in display order. Repeated labels are loaded once.
    /// * `.sample_size(usize)`: Optional. Maximum number of rows kept per region. Larger regions
    ///   are sampled uniformly with the loader's fixed seed; the kept rows stay in file order.
    /// * `.overrides(&Overrides)`: Optional. Uploaded CSV content used instead of the
    ///   registered file for the regions it names.
    ///
    /// # Errors
    ///
    /// * [`DatasetError::Registry`] for a label that is neither registered nor overridden.
    /// * [`DatasetError::MalformedInput`] when an override cannot be parsed.
    /// * [`DatasetError::CsvRead`] / [`DatasetError::MissingColumns`] for unreadable files.
    /// * [`DatasetError::SchemaMismatch`] when regions do not share the same columns.
    ///
    /// A registered file that does not exist is not an error: the region is skipped,
    /// logged, and listed in [`CombinedTable::skipped`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use solar_compare::{DatasetLoader, RegionRegistry, DatasetError};
    /// # fn main() -> Result<(), DatasetError> {
    /// let loader = DatasetLoader::new(RegionRegistry::default());
    /// let table = loader
    ///     .load()
    ///     .regions(&["Benin (Malanville)", "Togo (Dapaong)"])
    ///     .sample_size(5_000)
    ///     .call()?;
    /// println!("{}", table.frame);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn load(
        &self,
        regions: &[&str],
        sample_size: Option<usize>,
        overrides: Option<&Overrides>,
    ) -> Result<CombinedTable, DatasetError> {
        let mut requested: Vec<&str> = Vec::with_capacity(regions.len());
        for &region in regions {
            if !requested.contains(&region) {
                requested.push(region);
            }
        }

        let mut frames = Vec::with_capacity(requested.len());
        let mut skipped = Vec::new();

        for region in requested {
            let upload = overrides.and_then(|o| o.get(region));
            let raw = match upload {
                Some(source) => Self::read_override(region, source)?,
                None => match self.read_registered(region) {
                    Ok(df) => df,
                    Err(DatasetError::MissingDataset { region, path }) => {
                        warn!(
                            "Skipping region {}: dataset {} does not exist",
                            region,
                            path.display()
                        );
                        skipped.push(SkippedRegion { region, path });
                        continue;
                    }
                    Err(e) => return Err(e),
                },
            };
            let frame = self.prepare_region(raw, region, sample_size)?;
            debug!("Region {} contributes {} rows", region, frame.height());
            frames.push((region, frame));
        }

        let table = Self::concat_regions(frames, skipped)?;
        info!(
            "Loaded {} rows for {} regions ({} skipped)",
            table.height(),
            table.regions()?.len(),
            table.skipped.len()
        );
        Ok(table)
    }

    fn read_override(region: &str, source: &OverrideSource) -> Result<DataFrame, DatasetError> {
        info!(
            "Using uploaded data ({} bytes) for region {}",
            source.len(),
            region
        );
        let malformed = |message: String| DatasetError::MalformedInput {
            region: region.to_string(),
            message,
        };

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(source.bytes().to_vec()))
            .finish()
            .map_err(|e| malformed(e.to_string()))?;

        let found = cast_metric_columns(&mut df).map_err(|e| malformed(e.to_string()))?;
        if found == 0 {
            return Err(malformed(format!(
                "none of the metric columns {:?} are present",
                Metric::column_names().collect::<Vec<_>>()
            )));
        }
        Ok(df)
    }

    fn read_registered(&self, region: &str) -> Result<DataFrame, DatasetError> {
        let path = self.registry.source_for(region)?;
        if !path.exists() {
            return Err(DatasetError::MissingDataset {
                region: region.to_string(),
                path: path.to_path_buf(),
            });
        }
        info!("Reading dataset for region {} from {:?}", region, path);

        let csv_error = |e: PolarsError| DatasetError::CsvRead {
            region: region.to_string(),
            path: path.to_path_buf(),
            source: e,
        };
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(csv_error)?
            .finish()
            .map_err(csv_error)?;

        if cast_metric_columns(&mut df)? == 0 {
            warn!(
                "Dataset {} for region {} has no metric columns",
                path.display(),
                region
            );
            return Err(DatasetError::MissingColumns {
                region: region.to_string(),
            });
        }
        Ok(df)
    }

    fn prepare_region(
        &self,
        mut df: DataFrame,
        region: &str,
        sample_size: Option<usize>,
    ) -> Result<DataFrame, DatasetError> {
        parse_timestamp_column(&mut df)?;

        if let Some(sample_size) = sample_size {
            let height = df.height();
            df = sample_frame(df, sample_size, self.seed)?;
            if df.height() < height {
                debug!(
                    "Sampled {} of {} rows for region {}",
                    df.height(),
                    height,
                    region
                );
            }
        }

        let tags = Series::new(REGION_COLUMN.into(), vec![region; df.height()]);
        df.with_column(tags)?;
        Ok(df)
    }

    fn concat_regions(
        frames: Vec<(&str, DataFrame)>,
        skipped: Vec<SkippedRegion>,
    ) -> Result<CombinedTable, DatasetError> {
        let Some((_, first)) = frames.first() else {
            return Ok(CombinedTable::empty(skipped));
        };

        let columns = first.get_column_names_owned();
        let mut labels = Vec::with_capacity(frames.len());
        let mut aligned = Vec::with_capacity(frames.len());
        for (region, frame) in frames {
            let mismatch = |source: PolarsError| DatasetError::SchemaMismatch {
                region: region.to_string(),
                source,
            };
            if frame.width() != columns.len() {
                return Err(mismatch(PolarsError::ShapeMismatch(
                    format!("expected {} columns, found {}", columns.len(), frame.width()).into(),
                )));
            }
            aligned.push(frame.select(columns.clone()).map_err(mismatch)?.lazy());
            labels.push(region);
        }

        // Columns inferred as Int64 in one file and Float64 in another are widened.
        let args = UnionArgs {
            rechunk: true,
            to_supertypes: true,
            ..Default::default()
        };
        let combined = concat(aligned, args)
            .and_then(|lf| lf.collect())
            .map_err(|source| DatasetError::SchemaMismatch {
                region: labels.join(", "),
                source,
            })?;

        if combined.height() == 0 {
            return Ok(CombinedTable::empty(skipped));
        }
        Ok(CombinedTable::new(combined, skipped))
    }
}

/// Casts every metric column present in `df` to `Float64`; returns how many were found.
fn cast_metric_columns(df: &mut DataFrame) -> PolarsResult<usize> {
    let present: Vec<&str> = Metric::column_names()
        .filter(|name| df.column(name).is_ok())
        .collect();
    for name in &present {
        let casted = df.column(name)?.cast(&DataType::Float64)?;
        df.with_column(casted)?;
    }
    Ok(present.len())
}
