/// Arrow schema and conversion for the merged guidance table.
pub mod guidance {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;

    use crate::{GuidanceError, MergedItem};

    /// Schema for one row per merged guidance item.
    pub fn merged_table_schema() -> Schema {
        Schema::new(vec![
            Field::new("metric", DataType::Utf8, false),
            Field::new("guidance_value_text", DataType::Utf8, false),
            Field::new("period", DataType::Utf8, false),
            Field::new("period_type", DataType::Utf8, false),
            Field::new("low_end", DataType::Float64, true),
            Field::new("high_end", DataType::Float64, true),
            Field::new("average", DataType::Float64, true),
            Field::new("units", DataType::Utf8, false),
            Field::new("filing_date", DataType::Utf8, true),
            Field::new("source", DataType::Utf8, false),
            Field::new("provenance", DataType::Utf8, false),
            Field::new("note", DataType::Utf8, true),
        ])
    }

    /// Build a single RecordBatch from merged items, in the given order.
    ///
    /// Provenance is flattened to a `;`-joined string so the batch stays CSV-writable.
    pub fn to_record_batch(items: &[MergedItem]) -> Result<RecordBatch, GuidanceError> {
        let text = |f: fn(&MergedItem) -> String| -> ArrayRef {
            Arc::new(StringArray::from(items.iter().map(f).collect::<Vec<_>>()))
        };
        let num = |f: fn(&MergedItem) -> Option<f64>| -> ArrayRef {
            Arc::new(Float64Array::from(items.iter().map(f).collect::<Vec<_>>()))
        };

        let columns: Vec<ArrayRef> = vec![
            text(|m| m.metric.clone()),
            text(|m| m.guidance_value_text.clone()),
            text(|m| m.period.clone()),
            text(|m| m.period_type.to_string()),
            num(|m| m.low_end),
            num(|m| m.high_end),
            num(|m| m.average),
            text(|m| m.units.to_string()),
            Arc::new(StringArray::from(
                items.iter().map(|m| m.filing_date.clone()).collect::<Vec<_>>(),
            )),
            text(|m| m.source.to_string()),
            text(|m| m.provenance.iter().cloned().collect::<Vec<_>>().join(";")),
            Arc::new(StringArray::from(
                items
                    .iter()
                    .map(|m| m.is_conflict().then(|| "conflict".to_string()))
                    .collect::<Vec<_>>(),
            )),
        ];

        Ok(RecordBatch::try_new(Arc::new(merged_table_schema()), columns)?)
    }
}
