use chrono::{DateTime, Utc};

use crate::models::{AdditionalService, Customer, Package, Plan, Subscription, service_names};
use crate::table::{FieldError, FieldValue, TableRow};

fn timestamp(at: Option<DateTime<Utc>>) -> FieldValue {
    at.map(FieldValue::Timestamp).unwrap_or(FieldValue::Empty)
}

fn invalid(key: &str, value: &FieldValue) -> FieldError {
    FieldError::Invalid {
        key: key.to_string(),
        input: format!("{value:?}"),
    }
}

fn name(key: &str, value: FieldValue) -> Result<String, FieldError> {
    match value {
        FieldValue::Text(text) => Ok(text),
        other => Err(invalid(key, &other)),
    }
}

fn whole_number(key: &str, value: FieldValue) -> Result<i64, FieldError> {
    match value {
        FieldValue::Number(n) if n.fract() == 0.0 => Ok(n as i64),
        other => Err(invalid(key, &other)),
    }
}

fn amount(key: &str, value: FieldValue) -> Result<f64, FieldError> {
    match value {
        FieldValue::Number(n) => Ok(n),
        other => Err(invalid(key, &other)),
    }
}

fn optional_id(id: Option<i64>) -> FieldValue {
    id.map(|id| FieldValue::Number(id as f64))
        .unwrap_or(FieldValue::Empty)
}

impl TableRow for Customer {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "name" => FieldValue::Text(self.name.clone()),
            "age" => FieldValue::Number(self.age as f64),
            "created_at" => timestamp(self.created_at),
            "updated_at" => timestamp(self.updated_at),
            _ => FieldValue::Empty,
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match key {
            "name" => self.name = name(key, value)?,
            "age" => self.age = whole_number(key, value)?,
            "created_at" | "updated_at" => return Err(FieldError::ReadOnly(key.to_string())),
            _ => return Err(FieldError::Unknown(key.to_string())),
        }
        Ok(())
    }
}

macro_rules! priced_row {
    ($ty:ty) => {
        impl TableRow for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn field(&self, key: &str) -> FieldValue {
                match key {
                    "name" => FieldValue::Text(self.name.clone()),
                    "price" => FieldValue::Number(self.price),
                    "created_at" => timestamp(self.created_at),
                    "updated_at" => timestamp(self.updated_at),
                    _ => FieldValue::Empty,
                }
            }

            fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
                match key {
                    "name" => self.name = name(key, value)?,
                    "price" => self.price = amount(key, value)?,
                    "created_at" | "updated_at" => {
                        return Err(FieldError::ReadOnly(key.to_string()));
                    }
                    _ => return Err(FieldError::Unknown(key.to_string())),
                }
                Ok(())
            }
        }
    };
}

priced_row!(Plan);
priced_row!(AdditionalService);

impl TableRow for Package {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "name" => FieldValue::Text(self.name.clone()),
            "price" => self.price.map(FieldValue::Number).unwrap_or(FieldValue::Empty),
            "plan_id" => optional_id(self.plan_id),
            "adicional_services" => FieldValue::Text(service_names(&self.adicional_services)),
            "created_at" => timestamp(self.created_at),
            "updated_at" => timestamp(self.updated_at),
            _ => FieldValue::Empty,
        }
    }

    fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FieldError> {
        match key {
            "name" => self.name = name(key, value)?,
            "price" => {
                self.price = match value {
                    FieldValue::Empty => None,
                    other => Some(amount(key, other)?),
                }
            }
            "plan_id" | "adicional_services" | "created_at" | "updated_at" => {
                return Err(FieldError::ReadOnly(key.to_string()));
            }
            _ => return Err(FieldError::Unknown(key.to_string())),
        }
        Ok(())
    }
}

impl TableRow for Subscription {
    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, key: &str) -> FieldValue {
        match key {
            "customer_id" => FieldValue::Number(self.customer_id as f64),
            "plan_id" => optional_id(self.plan_id),
            "package_id" => optional_id(self.package_id),
            "adicional_services" => FieldValue::Text(service_names(&self.adicional_services)),
            "created_at" => timestamp(self.created_at),
            "updated_at" => timestamp(self.updated_at),
            _ => FieldValue::Empty,
        }
    }

    fn set_field(&mut self, key: &str, _value: FieldValue) -> Result<(), FieldError> {
        Err(FieldError::ReadOnly(key.to_string()))
    }
}
