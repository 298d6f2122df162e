//! Create forms and their client-side validation.
//!
//! Each form holds what the user typed and turns it into a request body with
//! `validate`. A form that fails validation never produces a body, so nothing reaches
//! the network. Messages are shown to users verbatim.

use crate::format::parse_decimal;
use crate::models::{
    AdditionalService, NewCustomer, NewPackage, NewPricedItem, NewSubscription, Package,
};

pub const MINIMUM_AGE: i64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("O nome é obrigatório.")]
    NameRequired,
    #[error("A idade deve ser 18 ou mais.")]
    Underage,
    #[error("O preço não pode ser negativo")]
    InvalidPrice,
    #[error("Você deve selecionar um cliente.")]
    CustomerRequired,
    #[error("Você deve selecionar um plano ou um pacote.")]
    PlanOrPackageRequired,
    #[error("Você não pode selecionar ambos: plano e pacote.")]
    PlanAndPackage,
}

fn required_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    Ok(name.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    pub name: String,
    pub age: String,
}

impl CustomerForm {
    pub fn validate(&self) -> Result<NewCustomer, ValidationError> {
        let name = required_name(&self.name)?;
        let age = self
            .age
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|age| *age >= MINIMUM_AGE)
            .ok_or(ValidationError::Underage)?;
        Ok(NewCustomer { name, age })
    }
}

/// Create form for plans and additional services. Price is required and positive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricedItemForm {
    pub name: String,
    pub price: String,
}

impl PricedItemForm {
    pub fn validate(&self) -> Result<NewPricedItem, ValidationError> {
        let name = required_name(&self.name)?;
        let price = parse_decimal(&self.price)
            .filter(|price| *price > 0.0)
            .ok_or(ValidationError::InvalidPrice)?;
        Ok(NewPricedItem { name, price })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageForm {
    pub name: String,
    /// Optional; blank means no price.
    pub price: String,
    pub plan_id: Option<i64>,
    pub service_ids: Vec<i64>,
}

impl PackageForm {
    pub fn toggle_service(&mut self, id: i64) {
        toggle(&mut self.service_ids, id);
    }

    pub fn validate(&self) -> Result<NewPackage, ValidationError> {
        let name = required_name(&self.name)?;
        let price = if self.price.trim().is_empty() {
            None
        } else {
            Some(
                parse_decimal(&self.price)
                    .filter(|price| *price >= 0.0)
                    .ok_or(ValidationError::InvalidPrice)?,
            )
        };
        Ok(NewPackage {
            name,
            plan_id: self.plan_id,
            adicional_service_ids: dedup(&self.service_ids),
            price,
        })
    }
}

/// Subscription form. Plan and package are mutually exclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionForm {
    pub customer_id: Option<i64>,
    pub plan_id: Option<i64>,
    pub package_id: Option<i64>,
    pub service_ids: Vec<i64>,
}

impl SubscriptionForm {
    /// Selecting a plan clears the package.
    pub fn select_plan(&mut self, plan_id: Option<i64>) {
        self.plan_id = plan_id;
        if plan_id.is_some() {
            self.package_id = None;
        }
    }

    /// Selecting a package clears the plan and drops services the package already has.
    pub fn select_package(&mut self, package_id: Option<i64>, packages: &[Package]) {
        self.package_id = package_id;
        if package_id.is_some() {
            self.plan_id = None;
        }
        let included = included_services(self.package_id, packages);
        self.service_ids.retain(|id| !included.contains(id));
    }

    pub fn toggle_service(&mut self, id: i64) {
        toggle(&mut self.service_ids, id);
    }

    /// Services that can still be added: everything not already in the selected package.
    pub fn available_services<'a>(
        &self,
        services: &'a [AdditionalService],
        packages: &[Package],
    ) -> Vec<&'a AdditionalService> {
        let included = included_services(self.package_id, packages);
        services
            .iter()
            .filter(|service| !included.contains(&service.id))
            .collect()
    }

    pub fn validate(&self) -> Result<NewSubscription, ValidationError> {
        match (self.plan_id, self.package_id) {
            (None, None) => return Err(ValidationError::PlanOrPackageRequired),
            (Some(_), Some(_)) => return Err(ValidationError::PlanAndPackage),
            _ => {}
        }
        let customer_id = self.customer_id.ok_or(ValidationError::CustomerRequired)?;
        Ok(NewSubscription {
            customer_id,
            plan_id: self.plan_id,
            package_id: self.package_id,
            adicional_service_ids: dedup(&self.service_ids),
        })
    }
}

fn included_services(package_id: Option<i64>, packages: &[Package]) -> Vec<i64> {
    package_id
        .and_then(|id| packages.iter().find(|p| p.id == id))
        .map(Package::service_ids)
        .unwrap_or_default()
}

fn toggle(ids: &mut Vec<i64>, id: i64) {
    if let Some(pos) = ids.iter().position(|existing| *existing == id) {
        ids.remove(pos);
    } else {
        ids.push(id);
    }
}

/// Keep first occurrences, preserving order.
fn dedup(ids: &[i64]) -> Vec<i64> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
