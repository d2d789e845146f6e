#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Province record, raw metric, and adequacy feature types.
//!
//! A province is identified by its short `province_key` code, which joins
//! the boundary geometry relation to the raw healthcare metrics relation.
//! The derived, normalized, and composite index types here are ephemeral:
//! they are rebuilt from the two source relations on every request.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Category a raw metric column belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricGroup {
    /// Medical staff headcounts.
    Staffing,
    /// Medical equipment and bed counts.
    Equipment,
    /// Insurance coverage figures.
    Insurance,
    /// Daily patient volumes.
    Utilization,
    /// Elderly population count.
    Elderly,
}

/// A raw metric column of the `adequacy_raw` relation.
///
/// The `snake_case` string form of each variant is the canonical column
/// name in the source store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MetricField {
    /// Physicians.
    DoctorsPhysician,
    /// Dentists.
    DoctorsDentist,
    /// Pharmacists.
    DoctorsPharmacist,
    /// Registered nurses.
    DoctorsRegisteredNurse,
    /// Specialist staff, all disciplines.
    DoctorsSpecialistTotal,
    /// CT scanners.
    EquipCtScanner,
    /// MRI machines.
    EquipMri,
    /// Lithotripters.
    EquipLithotripter,
    /// Ultrasound machines.
    EquipUltrasound,
    /// Dialysis machines.
    EquipDialysisMachine,
    /// Ambulances.
    EquipAmbulance,
    /// Hospital beds.
    EquipBedTotal,
    /// Universal coverage ("gold card") scheme figure.
    InsuranceUcScheme,
    /// Hospitals accepting the scheme.
    InsuranceHospitalCount,
    /// Average outpatients per day.
    OpdAvgOutpatientsPerDay,
    /// Average inpatients per day.
    IpdAvgInpatientsPerDay,
    /// Elderly population count.
    ElderlyPopulation,
}

impl MetricField {
    /// Returns the canonical column name of this metric.
    #[must_use]
    pub fn column_name(self) -> &'static str {
        match self {
            Self::DoctorsPhysician => "doctors_physician",
            Self::DoctorsDentist => "doctors_dentist",
            Self::DoctorsPharmacist => "doctors_pharmacist",
            Self::DoctorsRegisteredNurse => "doctors_registered_nurse",
            Self::DoctorsSpecialistTotal => "doctors_specialist_total",
            Self::EquipCtScanner => "equip_ct_scanner",
            Self::EquipMri => "equip_mri",
            Self::EquipLithotripter => "equip_lithotripter",
            Self::EquipUltrasound => "equip_ultrasound",
            Self::EquipDialysisMachine => "equip_dialysis_machine",
            Self::EquipAmbulance => "equip_ambulance",
            Self::EquipBedTotal => "equip_bed_total",
            Self::InsuranceUcScheme => "insurance_uc_scheme",
            Self::InsuranceHospitalCount => "insurance_hospital_count",
            Self::OpdAvgOutpatientsPerDay => "opd_avg_outpatients_per_day",
            Self::IpdAvgInpatientsPerDay => "ipd_avg_inpatients_per_day",
            Self::ElderlyPopulation => "elderly_population",
        }
    }

    /// Returns the group this metric is aggregated under.
    #[must_use]
    pub const fn group(self) -> MetricGroup {
        match self {
            Self::DoctorsPhysician
            | Self::DoctorsDentist
            | Self::DoctorsPharmacist
            | Self::DoctorsRegisteredNurse
            | Self::DoctorsSpecialistTotal => MetricGroup::Staffing,
            Self::EquipCtScanner
            | Self::EquipMri
            | Self::EquipLithotripter
            | Self::EquipUltrasound
            | Self::EquipDialysisMachine
            | Self::EquipAmbulance
            | Self::EquipBedTotal => MetricGroup::Equipment,
            Self::InsuranceUcScheme | Self::InsuranceHospitalCount => MetricGroup::Insurance,
            Self::OpdAvgOutpatientsPerDay | Self::IpdAvgInpatientsPerDay => {
                MetricGroup::Utilization
            }
            Self::ElderlyPopulation => MetricGroup::Elderly,
        }
    }

    /// Returns every metric column in canonical order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Returns the metric columns belonging to `group`, in canonical order.
    #[must_use]
    pub fn in_group(group: MetricGroup) -> Vec<Self> {
        Self::iter().filter(|f| f.group() == group).collect()
    }
}

/// Raw healthcare-resource metrics for one province.
///
/// All values are non-negative counts or rates. Absent source values never
/// reach this type: the loader rejects them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub doctors_physician: f64,
    pub doctors_dentist: f64,
    pub doctors_pharmacist: f64,
    pub doctors_registered_nurse: f64,
    pub doctors_specialist_total: f64,
    pub equip_ct_scanner: f64,
    pub equip_mri: f64,
    pub equip_lithotripter: f64,
    pub equip_ultrasound: f64,
    pub equip_dialysis_machine: f64,
    pub equip_ambulance: f64,
    pub equip_bed_total: f64,
    pub insurance_uc_scheme: f64,
    pub insurance_hospital_count: f64,
    pub opd_avg_outpatients_per_day: f64,
    pub ipd_avg_inpatients_per_day: f64,
    pub elderly_population: f64,
}

impl RawMetrics {
    /// Builds a metrics value by resolving every field through `value_of`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `value_of`.
    pub fn try_from_fn<E>(
        mut value_of: impl FnMut(MetricField) -> Result<f64, E>,
    ) -> Result<Self, E> {
        let mut metrics = Self::default();
        for field in MetricField::iter() {
            *metrics.field_mut(field) = value_of(field)?;
        }
        Ok(metrics)
    }

    /// Returns the value of a single metric.
    #[must_use]
    pub const fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::DoctorsPhysician => self.doctors_physician,
            MetricField::DoctorsDentist => self.doctors_dentist,
            MetricField::DoctorsPharmacist => self.doctors_pharmacist,
            MetricField::DoctorsRegisteredNurse => self.doctors_registered_nurse,
            MetricField::DoctorsSpecialistTotal => self.doctors_specialist_total,
            MetricField::EquipCtScanner => self.equip_ct_scanner,
            MetricField::EquipMri => self.equip_mri,
            MetricField::EquipLithotripter => self.equip_lithotripter,
            MetricField::EquipUltrasound => self.equip_ultrasound,
            MetricField::EquipDialysisMachine => self.equip_dialysis_machine,
            MetricField::EquipAmbulance => self.equip_ambulance,
            MetricField::EquipBedTotal => self.equip_bed_total,
            MetricField::InsuranceUcScheme => self.insurance_uc_scheme,
            MetricField::InsuranceHospitalCount => self.insurance_hospital_count,
            MetricField::OpdAvgOutpatientsPerDay => self.opd_avg_outpatients_per_day,
            MetricField::IpdAvgInpatientsPerDay => self.ipd_avg_inpatients_per_day,
            MetricField::ElderlyPopulation => self.elderly_population,
        }
    }

    /// Returns a mutable reference to a single metric.
    pub const fn field_mut(&mut self, field: MetricField) -> &mut f64 {
        match field {
            MetricField::DoctorsPhysician => &mut self.doctors_physician,
            MetricField::DoctorsDentist => &mut self.doctors_dentist,
            MetricField::DoctorsPharmacist => &mut self.doctors_pharmacist,
            MetricField::DoctorsRegisteredNurse => &mut self.doctors_registered_nurse,
            MetricField::DoctorsSpecialistTotal => &mut self.doctors_specialist_total,
            MetricField::EquipCtScanner => &mut self.equip_ct_scanner,
            MetricField::EquipMri => &mut self.equip_mri,
            MetricField::EquipLithotripter => &mut self.equip_lithotripter,
            MetricField::EquipUltrasound => &mut self.equip_ultrasound,
            MetricField::EquipDialysisMachine => &mut self.equip_dialysis_machine,
            MetricField::EquipAmbulance => &mut self.equip_ambulance,
            MetricField::EquipBedTotal => &mut self.equip_bed_total,
            MetricField::InsuranceUcScheme => &mut self.insurance_uc_scheme,
            MetricField::InsuranceHospitalCount => &mut self.insurance_hospital_count,
            MetricField::OpdAvgOutpatientsPerDay => &mut self.opd_avg_outpatients_per_day,
            MetricField::IpdAvgInpatientsPerDay => &mut self.ipd_avg_inpatients_per_day,
            MetricField::ElderlyPopulation => &mut self.elderly_population,
        }
    }

    /// Sums every metric in `group`.
    #[must_use]
    pub fn group_sum(&self, group: MetricGroup) -> f64 {
        MetricField::iter()
            .filter(|f| f.group() == group)
            .map(|f| self.get(f))
            .sum()
    }
}

/// One joined row of the geometry and metrics relations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvinceRecord {
    /// Stable short code; the join key between the two relations.
    pub province_key: String,
    /// Display name (`province_name_th`), used as the label client-side.
    pub display_name: String,
    /// Boundary in WGS84 lon/lat. Stored as a multi-polygon.
    pub geometry: geo::Geometry<f64>,
    /// Raw metric values.
    pub metrics: RawMetrics,
}

/// Per-province aggregate scores computed from raw metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// Sum of the staffing metrics.
    pub staff_score: f64,
    /// Sum of the equipment metrics.
    pub equipment_score: f64,
    /// Sum of the two insurance metrics, on their native scales.
    pub insurance_score: f64,
    /// Mean of the inpatient and outpatient daily averages.
    pub service_load: f64,
}

/// Features scaled to `[0, 1]` against the result-set maxima.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatures {
    /// `X1`: normalized staff score.
    pub staff: f64,
    /// `X2`: normalized equipment score.
    pub equipment: f64,
    /// `X3`: normalized insurance score.
    pub insurance: f64,
    /// `X4`: `1 - normalized service load`.
    pub service_load_inv: f64,
    /// `1 - normalized elderly population`. Not part of the index.
    pub elderly_inv: f64,
}

/// Maxima used as normalization divisors.
///
/// A zero maximum is reported as the substituted divisor `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormMax {
    pub staff_max: f64,
    pub equip_max: f64,
    pub ins_max: f64,
    pub svc_max: f64,
}

/// Weights of the adequacy index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub staff: f64,
    pub equipment: f64,
    pub insurance: f64,
    pub service_load: f64,
}

impl Weights {
    /// The fixed weights of the adequacy index.
    pub const ADEQUACY: Self = Self {
        staff: 0.40,
        equipment: 0.30,
        insurance: 0.15,
        service_load: 0.15,
    };

    /// Sum of all weights.
    #[must_use]
    pub fn sum(self) -> f64 {
        self.staff + self.equipment + self.insurance + self.service_load
    }
}
