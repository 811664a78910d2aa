//! Pharmacy survey document

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Record;

/// Survey answers of one pharmacy. Every field is optional text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacyFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edrpou: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pharmacy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_patients: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl PharmacyFields {
    /// Field names as they appear in templates, in schema order.
    pub const FIELD_NAMES: [&'static str; 18] = [
        "city",
        "region",
        "respondent",
        "pharmacyName",
        "fullAddress",
        "address",
        "edrpou",
        "phone",
        "experience",
        "position",
        "ageCategory",
        "pharmacyType",
        "dailyPatients",
        "employeeCount",
        "institutionType",
        "institutionName",
        "dosageForm",
        "manufacturer",
    ];

    fn values(&self) -> [&Option<String>; 18] {
        [
            &self.city,
            &self.region,
            &self.respondent,
            &self.pharmacy_name,
            &self.full_address,
            &self.address,
            &self.edrpou,
            &self.phone,
            &self.experience,
            &self.position,
            &self.age_category,
            &self.pharmacy_type,
            &self.daily_patients,
            &self.employee_count,
            &self.institution_type,
            &self.institution_name,
            &self.dosage_form,
            &self.manufacturer,
        ]
    }

    fn values_mut(&mut self) -> [&mut Option<String>; 18] {
        [
            &mut self.city,
            &mut self.region,
            &mut self.respondent,
            &mut self.pharmacy_name,
            &mut self.full_address,
            &mut self.address,
            &mut self.edrpou,
            &mut self.phone,
            &mut self.experience,
            &mut self.position,
            &mut self.age_category,
            &mut self.pharmacy_type,
            &mut self.daily_patients,
            &mut self.employee_count,
            &mut self.institution_type,
            &mut self.institution_name,
            &mut self.dosage_form,
            &mut self.manufacturer,
        ]
    }

    /// Copy every field that is set in `patch`; unset fields stay as they are.
    pub fn apply(&mut self, patch: PharmacyFields) {
        let PharmacyFields {
            city,
            region,
            respondent,
            pharmacy_name,
            full_address,
            address,
            edrpou,
            phone,
            experience,
            position,
            age_category,
            pharmacy_type,
            daily_patients,
            employee_count,
            institution_type,
            institution_name,
            dosage_form,
            manufacturer,
        } = patch;
        let incoming = [
            city,
            region,
            respondent,
            pharmacy_name,
            full_address,
            address,
            edrpou,
            phone,
            experience,
            position,
            age_category,
            pharmacy_type,
            daily_patients,
            employee_count,
            institution_type,
            institution_name,
            dosage_form,
            manufacturer,
        ];

        for (slot, value) in self.values_mut().into_iter().zip(incoming) {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    /// Flatten into a fill record. Unset fields become `FieldValue::Empty`.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        for (name, value) in Self::FIELD_NAMES.iter().zip(self.values()) {
            record.insert(*name, value.clone());
        }
        record
    }
}

/// A stored pharmacy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: PharmacyFields,
}

impl Pharmacy {
    pub fn new(fields: PharmacyFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            fields,
        }
    }

    /// The document id is storage bookkeeping and never part of the record.
    pub fn to_record(&self) -> Record {
        self.fields.to_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"city": "Львів", "pharmacyName": "Аптека Копійка", "ageCategory": "31-45"}"#;
        let fields: PharmacyFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.city.as_deref(), Some("Львів"));
        assert_eq!(fields.pharmacy_name.as_deref(), Some("Аптека Копійка"));
        assert_eq!(fields.age_category.as_deref(), Some("31-45"));
        assert!(fields.phone.is_none());
    }

    #[test]
    fn test_serialize_skips_unset_and_uses_underscore_id() {
        let pharmacy = Pharmacy::new(PharmacyFields {
            phone: Some("063-030-1943".to_string()),
            ..Default::default()
        });
        let value = serde_json::to_value(&pharmacy).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["_id"], pharmacy.id.to_string());
        assert_eq!(obj["phone"], "063-030-1943");
    }

    #[test]
    fn test_apply_only_overwrites_set_fields() {
        let mut fields = PharmacyFields {
            phone: Some("063".to_string()),
            experience: Some("10+".to_string()),
            ..Default::default()
        };
        fields.apply(PharmacyFields {
            phone: Some("097-123-4567".to_string()),
            ..Default::default()
        });
        assert_eq!(fields.phone.as_deref(), Some("097-123-4567"));
        assert_eq!(fields.experience.as_deref(), Some("10+"));
    }

    #[test]
    fn test_to_record_has_every_field_in_schema_order() {
        let record = PharmacyFields {
            city: Some("Львів".to_string()),
            manufacturer: Some("Дарниця".to_string()),
            ..Default::default()
        }
        .to_record();

        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, PharmacyFields::FIELD_NAMES.to_vec());
        assert_eq!(record.get("city"), Some(&FieldValue::from("Львів")));
        assert_eq!(record.get("phone"), Some(&FieldValue::Empty));
        assert!(record.get("_id").is_none());
    }
}
