use kernel::{ParentRef, StoredAttribute};
use uuid::Uuid;

use super::dto::{UpsertEntityCommand, UpsertEntityResultDto};
use super::error::UpsertEntityError;
use super::ports::UpsertEntityPort;

pub struct UpsertEntityUseCase<P: UpsertEntityPort> {
    port: P,
}

impl<P: UpsertEntityPort> UpsertEntityUseCase<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    #[tracing::instrument(name = "upsert_entity_use_case", skip(self, command), fields(application_id = %command.application_id, entity_type = %command.entity_type, entity_id = %command.entity_id))]
    pub async fn execute(&self, command: UpsertEntityCommand) -> Result<UpsertEntityResultDto, UpsertEntityError> {
        let mut attributes = std::collections::HashMap::with_capacity(command.attributes.len());
        for (name, value) in &command.attributes {
            attributes.insert(name.clone(), json_to_stored_attribute(value)?);
        }

        let parents = command
            .parents
            .into_iter()
            .map(|p| ParentRef {
                parent_type: p.parent_type,
                parent_id: p.parent_id,
            })
            .collect();

        let now = time::OffsetDateTime::now_utc();
        let record = kernel::EntityRecord {
            id: Uuid::new_v4().to_string(),
            application_id: command.application_id,
            entity_type: command.entity_type,
            entity_id: command.entity_id,
            attributes,
            parents,
            created_at: now,
            updated_at: now,
        };

        let record = self.port.upsert(record).await?;

        tracing::info!(entity_type = %record.entity_type, entity_id = %record.entity_id, "upserted entity");

        Ok(UpsertEntityResultDto {
            entity_type: record.entity_type,
            entity_id: record.entity_id,
        })
    }
}

/// Converts a wire-level JSON attribute value into its stored form,
/// following the same numeric rule as the context translator: integral
/// floats become `Long`, non-integral floats are stringified rather than
/// silently truncated, and `null` has no stored representation.
fn json_to_stored_attribute(value: &serde_json::Value) -> Result<StoredAttribute, UpsertEntityError> {
    match value {
        serde_json::Value::Bool(b) => Ok(StoredAttribute::Bool(*b)),
        serde_json::Value::String(s) => Ok(StoredAttribute::String(s.clone())),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(StoredAttribute::Long(i))
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.is_finite() {
                    Ok(StoredAttribute::Long(f as i64))
                } else {
                    Ok(StoredAttribute::String(f.to_string()))
                }
            } else {
                Err(UpsertEntityError::InvalidAttribute(format!("unrepresentable number: {n}")))
            }
        }
        serde_json::Value::Array(items) => {
            let mut converted = Vec::with_capacity(items.len());
            for item in items {
                converted.push(json_to_stored_attribute(item)?);
            }
            Ok(StoredAttribute::Set(converted))
        }
        serde_json::Value::Object(map) => {
            let mut converted = std::collections::HashMap::with_capacity(map.len());
            for (key, item) in map {
                converted.insert(key.clone(), json_to_stored_attribute(item)?);
            }
            Ok(StoredAttribute::Record(converted))
        }
        serde_json::Value::Null => Err(UpsertEntityError::InvalidAttribute(
            "null attribute values are not supported".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_and_string_convert_directly() {
        assert_eq!(
            json_to_stored_attribute(&serde_json::json!(true)).unwrap(),
            StoredAttribute::Bool(true)
        );
        assert_eq!(
            json_to_stored_attribute(&serde_json::json!("x")).unwrap(),
            StoredAttribute::String("x".to_string())
        );
    }

    #[test]
    fn integral_float_becomes_long() {
        assert_eq!(
            json_to_stored_attribute(&serde_json::json!(3.0)).unwrap(),
            StoredAttribute::Long(3)
        );
    }

    #[test]
    fn fractional_float_is_stringified() {
        assert_eq!(
            json_to_stored_attribute(&serde_json::json!(3.5)).unwrap(),
            StoredAttribute::String("3.5".to_string())
        );
    }

    #[test]
    fn null_is_rejected() {
        assert!(json_to_stored_attribute(&serde_json::Value::Null).is_err());
    }
}
