//! Role dashboards: aggregate views computed from already-fetched lists.
//!
//! The `*_dashboard` functions are pure: given the rows and `today` they
//! produce the numbers and short lists a home screen shows. The `load_*`
//! functions fetch the lists for the signed-in user and call them.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{
    Appointment, AuthUser, Doctor, MedicalRecord, Medicine, OrderStatus, Patient, Payment, PaymentStatus,
    PaymentType, Pharmacist, PharmacyOrder, Prescription, PrescriptionStatus, Role,
};

/// Length of every "recent"/"upcoming" list.
pub const RECENT_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Row counts keyed by status wire value.
pub type StatusCounts = BTreeMap<&'static str, usize>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorDashboard {
    pub todays_appointments: Vec<Appointment>,
    pub upcoming_appointments: Vec<Appointment>,
    pub appointments_by_status: StatusCounts,
    /// Distinct patients across the doctor's appointments.
    pub patient_count: usize,
    pub active_prescriptions: usize,
    pub recent_records: Vec<MedicalRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientDashboard {
    pub next_appointment: Option<Appointment>,
    pub upcoming_appointments: Vec<Appointment>,
    pub active_prescriptions: Vec<Prescription>,
    pub recent_records: Vec<MedicalRecord>,
    /// Orders still awaiting payment or fulfilment.
    pub open_orders: Vec<PharmacyOrder>,
    pub amount_due: f64,
    pub total_paid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PharmacistDashboard {
    pub pending_orders: Vec<PharmacyOrder>,
    pub orders_by_status: StatusCounts,
    pub medicine_count: usize,
    pub low_stock: Vec<Medicine>,
    pub expired: Vec<Medicine>,
    /// Successful order payments.
    pub order_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboard {
    pub patient_count: usize,
    pub doctor_count: usize,
    pub pharmacist_count: usize,
    pub appointments_by_status: StatusCounts,
    pub orders_by_status: StatusCounts,
    pub payments_by_status: StatusCounts,
    pub revenue: f64,
    pub recent_payments: Vec<Payment>,
    pub low_stock_count: usize,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn count_by<T>(items: &[T], key: impl Fn(&T) -> &'static str) -> StatusCounts {
    let mut counts = StatusCounts::new();
    for item in items {
        *counts.entry(key(item)).or_default() += 1;
    }
    counts
}

/// Non-terminal appointments from today on, soonest first.
fn upcoming<'a>(appointments: impl Iterator<Item = &'a Appointment>, today: NaiveDate) -> Vec<Appointment> {
    let mut out: Vec<Appointment> = appointments
        .filter(|a| a.appointment_date.is_some_and(|d| d >= today) && !a.status.is_terminal())
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        (a.appointment_date, a.appointment_time.as_deref()).cmp(&(b.appointment_date, b.appointment_time.as_deref()))
    });
    out
}

/// Newest first by `created_at`; rows without a timestamp go last.
fn most_recent<T: Clone>(items: &[T], created_at: impl Fn(&T) -> Option<&str>, limit: usize) -> Vec<T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    sorted.into_iter().take(limit).cloned().collect()
}

fn successful_total<'a>(payments: impl Iterator<Item = &'a Payment>) -> f64 {
    payments
        .filter(|p| p.status == PaymentStatus::Success)
        .map(|p| p.amount)
        .sum()
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

pub fn doctor_dashboard(
    doctor_id: &str,
    today: NaiveDate,
    appointments: &[Appointment],
    prescriptions: &[Prescription],
    records: &[MedicalRecord],
) -> DoctorDashboard {
    let mine: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id)
        .cloned()
        .collect();
    let my_records: Vec<MedicalRecord> = records
        .iter()
        .filter(|r| r.doctor_id.as_deref() == Some(doctor_id))
        .cloned()
        .collect();

    let mut todays: Vec<Appointment> = mine
        .iter()
        .filter(|a| a.appointment_date == Some(today))
        .cloned()
        .collect();
    todays.sort_by(|a, b| a.appointment_time.cmp(&b.appointment_time));

    DoctorDashboard {
        todays_appointments: todays,
        upcoming_appointments: upcoming(mine.iter(), today).into_iter().take(RECENT_LIMIT).collect(),
        appointments_by_status: count_by(&mine, |a| a.status.as_str()),
        patient_count: mine.iter().map(|a| a.patient_id.as_str()).collect::<HashSet<_>>().len(),
        active_prescriptions: prescriptions
            .iter()
            .filter(|p| p.doctor_id == doctor_id && p.status == PrescriptionStatus::Active)
            .count(),
        recent_records: most_recent(&my_records, |r| r.created_at.as_deref(), RECENT_LIMIT),
    }
}

/// Payments carry payer details rather than a patient id, so they are
/// matched on email.
pub fn patient_dashboard(
    patient: &AuthUser,
    today: NaiveDate,
    appointments: &[Appointment],
    prescriptions: &[Prescription],
    records: &[MedicalRecord],
    orders: &[PharmacyOrder],
    payments: &[Payment],
) -> PatientDashboard {
    let upcoming_appointments = upcoming(appointments.iter().filter(|a| a.patient_id == patient.id), today);
    let my_records: Vec<MedicalRecord> = records
        .iter()
        .filter(|r| r.patient_id == patient.id)
        .cloned()
        .collect();
    let open_orders: Vec<PharmacyOrder> = orders
        .iter()
        .filter(|o| o.patient_id == patient.id && !o.status.is_closed())
        .cloned()
        .collect();

    PatientDashboard {
        next_appointment: upcoming_appointments.first().cloned(),
        upcoming_appointments: upcoming_appointments.into_iter().take(RECENT_LIMIT).collect(),
        active_prescriptions: prescriptions
            .iter()
            .filter(|p| p.patient_id == patient.id && p.status == PrescriptionStatus::Active)
            .cloned()
            .collect(),
        recent_records: most_recent(&my_records, |r| r.created_at.as_deref(), RECENT_LIMIT),
        amount_due: open_orders.iter().map(|o| o.total_amount).sum(),
        open_orders,
        total_paid: successful_total(
            payments
                .iter()
                .filter(|p| p.email.trim().eq_ignore_ascii_case(patient.email.trim())),
        ),
    }
}

pub fn pharmacist_dashboard(
    today: NaiveDate,
    orders: &[PharmacyOrder],
    medicines: &[Medicine],
    payments: &[Payment],
) -> PharmacistDashboard {
    PharmacistDashboard {
        pending_orders: orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .cloned()
            .collect(),
        orders_by_status: count_by(orders, |o| o.status.as_str()),
        medicine_count: medicines.len(),
        low_stock: medicines.iter().filter(|m| m.is_low_stock()).cloned().collect(),
        expired: medicines.iter().filter(|m| m.is_expired(today)).cloned().collect(),
        order_revenue: successful_total(payments.iter().filter(|p| p.payment_type == PaymentType::Order)),
    }
}

pub fn admin_dashboard(
    patients: &[Patient],
    doctors: &[Doctor],
    pharmacists: &[Pharmacist],
    appointments: &[Appointment],
    orders: &[PharmacyOrder],
    payments: &[Payment],
    medicines: &[Medicine],
) -> AdminDashboard {
    AdminDashboard {
        patient_count: patients.len(),
        doctor_count: doctors.len(),
        pharmacist_count: pharmacists.len(),
        appointments_by_status: count_by(appointments, |a| a.status.as_str()),
        orders_by_status: count_by(orders, |o| o.status.as_str()),
        payments_by_status: count_by(payments, |p| p.status.as_str()),
        revenue: successful_total(payments.iter()),
        recent_payments: most_recent(payments, |p| p.created_at.as_deref(), RECENT_LIMIT),
        low_stock_count: medicines.iter().filter(|m| m.is_low_stock()).count(),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn signed_in_as(client: &ApiClient, role: Role) -> Result<AuthUser, ClientError> {
    let user = client.session().current_user().ok_or(ClientError::NotAuthenticated)?;
    if user.role != role && user.role != Role::Admin {
        return Err(ClientError::ActionDisabled("dashboard belongs to another role"));
    }
    Ok(user)
}

pub async fn load_doctor_dashboard(client: &ApiClient, today: NaiveDate) -> Result<DoctorDashboard, ClientError> {
    let user = signed_in_as(client, Role::Doctor)?;
    let (appointments, prescriptions, records) = tokio::try_join!(
        client.fetch_all::<Appointment>(),
        client.fetch_all::<Prescription>(),
        client.fetch_all::<MedicalRecord>(),
    )?;
    Ok(doctor_dashboard(&user.id, today, &appointments, &prescriptions, &records))
}

pub async fn load_patient_dashboard(client: &ApiClient, today: NaiveDate) -> Result<PatientDashboard, ClientError> {
    let user = signed_in_as(client, Role::Patient)?;
    let (appointments, prescriptions, records, orders, payments) = tokio::try_join!(
        client.fetch_all::<Appointment>(),
        client.fetch_all::<Prescription>(),
        client.fetch_all::<MedicalRecord>(),
        client.fetch_all::<PharmacyOrder>(),
        client.fetch_all::<Payment>(),
    )?;
    Ok(patient_dashboard(
        &user,
        today,
        &appointments,
        &prescriptions,
        &records,
        &orders,
        &payments,
    ))
}

pub async fn load_pharmacist_dashboard(
    client: &ApiClient,
    today: NaiveDate,
) -> Result<PharmacistDashboard, ClientError> {
    signed_in_as(client, Role::Pharmacist)?;
    let (orders, medicines, payments) = tokio::try_join!(
        client.fetch_all::<PharmacyOrder>(),
        client.fetch_all::<Medicine>(),
        client.fetch_all::<Payment>(),
    )?;
    Ok(pharmacist_dashboard(today, &orders, &medicines, &payments))
}

pub async fn load_admin_dashboard(client: &ApiClient) -> Result<AdminDashboard, ClientError> {
    signed_in_as(client, Role::Admin)?;
    let (patients, doctors, pharmacists, appointments, orders, payments, medicines) = tokio::try_join!(
        client.fetch_all::<Patient>(),
        client.fetch_all::<Doctor>(),
        client.fetch_all::<Pharmacist>(),
        client.fetch_all::<Appointment>(),
        client.fetch_all::<PharmacyOrder>(),
        client.fetch_all::<Payment>(),
        client.fetch_all::<Medicine>(),
    )?;
    tracing::debug!(
        patients = patients.len(),
        appointments = appointments.len(),
        payments = payments.len(),
        "Admin dashboard loaded"
    );
    Ok(admin_dashboard(
        &patients,
        &doctors,
        &pharmacists,
        &appointments,
        &orders,
        &payments,
        &medicines,
    ))
}
