//! Column, form and action configuration for each entity table.

use serde_json::{Map, Value};

use super::column::{CellRenderer, CellValue, ColumnDef};
use super::controller::{EntityConfig, PaginationMode, RowAction};
use super::form::{FieldKind, FormField, FormSchema};
use crate::models::{
    Appointment, AppointmentPriority, AppointmentStatus, AuthUser, MedicalRecord, Medicine, OrderStatus,
    Patient, Payment, PaymentStatus, Pharmacist, PharmacyOrder, Prescription, PrescriptionStatus, Role,
};
use crate::workflow::appointment::{can_cancel, can_join};
use crate::workflow::order::can_cancel_order;
use crate::workflow::payment::can_pay;

fn role(user: Option<&AuthUser>) -> Option<Role> {
    user.map(|u| u.role)
}

fn staff_edit_admin_delete(user: Option<&AuthUser>, editors: &[Role]) -> Vec<RowAction> {
    let mut actions = Vec::new();
    if let Some(role) = role(user) {
        if editors.contains(&role) || role == Role::Admin {
            actions.push(RowAction::Edit);
        }
        if role == Role::Admin {
            actions.push(RowAction::Delete);
        }
    }
    actions
}

fn name_or_id(name: Option<&str>, id: &str) -> CellValue {
    CellValue::opt_text(name.or(Some(id)))
}

fn notes() -> FormField {
    FormField::new("notes", "Notes", FieldKind::TextArea)
}

// ─── Appointments ─────────────────────────────────────────────────────────────

pub fn appointments() -> EntityConfig<Appointment> {
    EntityConfig {
        title: "Appointments",
        columns: vec![
            ColumnDef::new("patient", "Patient", |a: &Appointment| {
                name_or_id(a.patient_name.as_deref(), &a.patient_id)
            })
            .searchable(),
            ColumnDef::new("doctor", "Doctor", |a: &Appointment| {
                name_or_id(a.doctor_name.as_deref(), &a.doctor_id)
            })
            .searchable(),
            ColumnDef::new("date", "Date", |a: &Appointment| CellValue::opt_date(a.appointment_date))
                .render_as(CellRenderer::Date),
            ColumnDef::new("time", "Time", |a: &Appointment| CellValue::opt_text(a.appointment_time.as_deref())),
            ColumnDef::new("reason", "Reason", |a: &Appointment| CellValue::text(&a.reason))
                .render_as(CellRenderer::Truncate(40))
                .searchable(),
            ColumnDef::new("priority", "Priority", |a: &Appointment| CellValue::Status {
                label: a.priority.as_str(),
                tone: a.priority.tone(),
            })
            .render_as(CellRenderer::StatusPill),
            ColumnDef::new("status", "Status", |a: &Appointment| CellValue::Status {
                label: a.status.as_str(),
                tone: a.status.tone(),
            })
            .render_as(CellRenderer::StatusPill),
        ],
        pagination: PaginationMode::Server,
        create_form: Some(FormSchema::new(vec![
            FormField::new("patient_id", "Patient", FieldKind::Text).required(),
            FormField::new("doctor_id", "Doctor", FieldKind::Text).required(),
            FormField::new("appointment_date", "Date", FieldKind::Date).required(),
            FormField::new("appointment_time", "Time", FieldKind::Time).required(),
            FormField::new("reason", "Reason", FieldKind::TextArea).required(),
            FormField::select("priority", "Priority", AppointmentPriority::ALL.iter().map(|p| p.as_str())),
            FormField::new("duration", "Duration (minutes)", FieldKind::Number).min(5.0).max(480.0),
            notes(),
        ])),
        edit_form: Some(FormSchema::new(vec![
            FormField::select("status", "Status", AppointmentStatus::ALL.iter().map(|s| s.as_str())).required(),
            FormField::new("appointment_date", "Date", FieldKind::Date),
            FormField::new("appointment_time", "Time", FieldKind::Time),
            FormField::new("reason", "Reason", FieldKind::TextArea),
            FormField::select("priority", "Priority", AppointmentPriority::ALL.iter().map(|p| p.as_str())),
            FormField::new("duration", "Duration (minutes)", FieldKind::Number).min(5.0).max(480.0),
            notes(),
        ])),
        shape_create: None,
        actions: appointment_actions,
    }
}

fn appointment_actions(user: Option<&AuthUser>, appointment: &Appointment) -> Vec<RowAction> {
    if user.is_none() {
        return Vec::new();
    }
    let mut actions = Vec::new();
    if can_join(appointment) {
        actions.push(RowAction::Join);
    }
    if can_cancel(appointment) {
        actions.push(RowAction::Cancel);
    }
    actions.extend(staff_edit_admin_delete(user, &[Role::Doctor]));
    actions
}

// ─── Medicines ────────────────────────────────────────────────────────────────

fn medicine_fields(required: bool) -> Vec<FormField> {
    let req = |f: FormField| if required { f.required() } else { f };
    vec![
        req(FormField::new("name", "Name", FieldKind::Text)),
        FormField::new("description", "Description", FieldKind::TextArea),
        FormField::new("manufacturer", "Manufacturer", FieldKind::Text),
        FormField::new("category", "Category", FieldKind::Text),
        req(FormField::new("price", "Price", FieldKind::Number).positive()),
        req(FormField::new("stock_quantity", "Stock", FieldKind::Number).min(0.0)),
        FormField::new("expiry_date", "Expiry date", FieldKind::Date),
    ]
}

pub fn medicines() -> EntityConfig<Medicine> {
    EntityConfig {
        title: "Medicines",
        columns: vec![
            ColumnDef::new("name", "Name", |m: &Medicine| CellValue::text(&m.name)).searchable(),
            ColumnDef::new("category", "Category", |m: &Medicine| CellValue::opt_text(m.category.as_deref()))
                .searchable(),
            ColumnDef::new("manufacturer", "Manufacturer", |m: &Medicine| {
                CellValue::opt_text(m.manufacturer.as_deref())
            }),
            ColumnDef::new("price", "Price", |m: &Medicine| CellValue::Number(m.price))
                .render_as(CellRenderer::Currency),
            ColumnDef::new("stock", "Stock", |m: &Medicine| CellValue::Number(f64::from(m.stock_quantity))),
            ColumnDef::new("expiry", "Expiry", |m: &Medicine| CellValue::opt_date(m.expiry_date))
                .render_as(CellRenderer::Date),
        ],
        pagination: PaginationMode::Server,
        create_form: Some(FormSchema::new(medicine_fields(true))),
        edit_form: Some(FormSchema::new(medicine_fields(false))),
        shape_create: None,
        actions: |user, _| staff_edit_admin_delete(user, &[Role::Pharmacist]),
    }
}

// ─── People ───────────────────────────────────────────────────────────────────

pub fn patients() -> EntityConfig<Patient> {
    let fields = |create: bool| {
        let mut fields = vec![
            FormField::new("name", "Full name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("phone", "Phone", FieldKind::Text),
            FormField::select("gender", "Gender", ["male", "female", "other"]),
            FormField::new("date_of_birth", "Date of birth", FieldKind::Date),
            FormField::new("address", "Address", FieldKind::TextArea),
            FormField::new("blood_group", "Blood group", FieldKind::Text),
        ];
        if create {
            fields.push(FormField::new("password", "Password", FieldKind::Password));
        }
        FormSchema::new(fields)
    };

    EntityConfig {
        title: "Patients",
        columns: vec![
            ColumnDef::new("name", "Name", |p: &Patient| CellValue::text(&p.name)).searchable(),
            ColumnDef::new("email", "Email", |p: &Patient| CellValue::text(&p.email)).searchable(),
            ColumnDef::new("phone", "Phone", |p: &Patient| CellValue::opt_text(p.phone.as_deref())).searchable(),
            ColumnDef::new("gender", "Gender", |p: &Patient| CellValue::opt_text(p.gender.as_deref())),
            ColumnDef::new("dob", "Date of birth", |p: &Patient| CellValue::opt_date(p.date_of_birth))
                .render_as(CellRenderer::Date),
            ColumnDef::new("blood_group", "Blood group", |p: &Patient| {
                CellValue::opt_text(p.blood_group.as_deref())
            }),
        ],
        pagination: PaginationMode::Client,
        create_form: Some(fields(true)),
        edit_form: Some(fields(false)),
        shape_create: None,
        actions: |user, _| staff_edit_admin_delete(user, &[Role::Doctor]),
    }
}

pub fn pharmacists() -> EntityConfig<Pharmacist> {
    let fields = |create: bool| {
        let mut fields = vec![
            FormField::new("name", "Full name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("phone", "Phone", FieldKind::Text),
            FormField::new("pharmacy_name", "Pharmacy", FieldKind::Text),
            FormField::new("license_number", "License number", FieldKind::Text),
        ];
        if create {
            fields.push(FormField::new("password", "Password", FieldKind::Password));
        }
        FormSchema::new(fields)
    };

    EntityConfig {
        title: "Pharmacists",
        columns: vec![
            ColumnDef::new("name", "Name", |p: &Pharmacist| CellValue::text(&p.name)).searchable(),
            ColumnDef::new("email", "Email", |p: &Pharmacist| CellValue::text(&p.email)).searchable(),
            ColumnDef::new("phone", "Phone", |p: &Pharmacist| CellValue::opt_text(p.phone.as_deref())),
            ColumnDef::new("pharmacy", "Pharmacy", |p: &Pharmacist| {
                CellValue::opt_text(p.pharmacy_name.as_deref())
            })
            .searchable(),
            ColumnDef::new("license", "License", |p: &Pharmacist| {
                CellValue::opt_text(p.license_number.as_deref())
            }),
        ],
        pagination: PaginationMode::Server,
        create_form: Some(fields(true)),
        edit_form: Some(fields(false)),
        shape_create: None,
        actions: |user, _| staff_edit_admin_delete(user, &[]),
    }
}

// ─── Payments ─────────────────────────────────────────────────────────────────

/// Payments are only created through checkout initialization, so the table
/// has no create form.
pub fn payments() -> EntityConfig<Payment> {
    EntityConfig {
        title: "Payments",
        columns: vec![
            ColumnDef::new("payer", "Payer", |p: &Payment| CellValue::text(&p.full_name)).searchable(),
            ColumnDef::new("email", "Email", |p: &Payment| CellValue::text(&p.email)).searchable(),
            ColumnDef::new("amount", "Amount", |p: &Payment| CellValue::Number(p.amount))
                .render_as(CellRenderer::Currency),
            ColumnDef::new("type", "Type", |p: &Payment| CellValue::text(p.payment_type.as_str())),
            ColumnDef::new("status", "Status", |p: &Payment| CellValue::Status {
                label: p.status.as_str(),
                tone: p.status.tone(),
            })
            .render_as(CellRenderer::StatusPill),
            ColumnDef::new("reference", "Reference", |p: &Payment| CellValue::opt_text(p.reference.as_deref()))
                .searchable(),
            ColumnDef::new("created", "Date", |p: &Payment| CellValue::opt_timestamp(p.created_at.as_deref()))
                .render_as(CellRenderer::DateTime),
        ],
        pagination: PaginationMode::Server,
        create_form: None,
        edit_form: Some(FormSchema::new(vec![
            FormField::select("status", "Status", PaymentStatus::ALL.iter().map(|s| s.as_str())).required(),
            notes(),
        ])),
        shape_create: None,
        actions: payment_actions,
    }
}

fn payment_actions(user: Option<&AuthUser>, payment: &Payment) -> Vec<RowAction> {
    let mut actions = Vec::new();
    if user.is_some() && payment.status == PaymentStatus::Pending && payment.reference.is_some() {
        actions.push(RowAction::Verify);
    }
    if role(user) == Some(Role::Admin) {
        actions.push(RowAction::Edit);
    }
    actions
}

// ─── Prescriptions ────────────────────────────────────────────────────────────

/// The create form collects one medication; the body nests it.
fn nest_medication(body: &mut Map<String, Value>) {
    let mut medication = Map::new();
    for (form_key, wire_key) in [
        ("medication_name", "name"),
        ("dosage", "dosage"),
        ("frequency", "frequency"),
        ("medication_duration", "duration"),
    ] {
        if let Some(value) = body.remove(form_key) {
            medication.insert(wire_key.to_string(), value);
        }
    }
    body.insert("medications".into(), Value::Array(vec![Value::Object(medication)]));
}

pub fn prescriptions() -> EntityConfig<Prescription> {
    EntityConfig {
        title: "Prescriptions",
        columns: vec![
            ColumnDef::new("patient", "Patient", |p: &Prescription| {
                name_or_id(p.patient_name.as_deref(), &p.patient_id)
            })
            .searchable(),
            ColumnDef::new("doctor", "Doctor", |p: &Prescription| {
                name_or_id(p.doctor_name.as_deref(), &p.doctor_id)
            }),
            ColumnDef::new("medications", "Medications", |p: &Prescription| {
                CellValue::text(p.medication_summary())
            })
            .render_as(CellRenderer::Truncate(40))
            .searchable(),
            ColumnDef::new("diagnosis", "Diagnosis", |p: &Prescription| {
                CellValue::opt_text(p.diagnosis.as_deref())
            })
            .render_as(CellRenderer::Truncate(40)),
            ColumnDef::new("status", "Status", |p: &Prescription| CellValue::Status {
                label: p.status.as_str(),
                tone: p.status.tone(),
            })
            .render_as(CellRenderer::StatusPill),
            ColumnDef::new("issued", "Issued", |p: &Prescription| CellValue::opt_date(p.issued_date))
                .render_as(CellRenderer::Date),
        ],
        pagination: PaginationMode::Server,
        create_form: Some(FormSchema::new(vec![
            FormField::new("patient_id", "Patient", FieldKind::Text).required(),
            FormField::new("doctor_id", "Doctor", FieldKind::Text).required(),
            FormField::new("medication_name", "Medication", FieldKind::Text).required(),
            FormField::new("dosage", "Dosage", FieldKind::Text).required(),
            FormField::new("frequency", "Frequency", FieldKind::Text).required(),
            FormField::new("medication_duration", "Duration", FieldKind::Text),
            FormField::new("diagnosis", "Diagnosis", FieldKind::TextArea),
            FormField::new("instructions", "Instructions", FieldKind::TextArea),
        ])),
        edit_form: Some(FormSchema::new(vec![
            FormField::select("status", "Status", PrescriptionStatus::ALL.iter().map(|s| s.as_str())),
            FormField::new("diagnosis", "Diagnosis", FieldKind::TextArea),
            FormField::new("instructions", "Instructions", FieldKind::TextArea),
        ])),
        shape_create: Some(nest_medication),
        actions: |user, _| {
            let mut actions = staff_edit_admin_delete(user, &[Role::Doctor, Role::Pharmacist]);
            if role(user) == Some(Role::Doctor) {
                actions.push(RowAction::Delete);
            }
            actions
        },
    }
}

// ─── Medical records ──────────────────────────────────────────────────────────

pub fn medical_records() -> EntityConfig<MedicalRecord> {
    let fields = |create: bool| {
        let mut fields = Vec::new();
        if create {
            fields.push(FormField::new("patient_id", "Patient", FieldKind::Text).required());
            fields.push(FormField::new("doctor_id", "Doctor", FieldKind::Text));
        }
        let diagnosis = FormField::new("diagnosis", "Diagnosis", FieldKind::TextArea);
        fields.push(if create { diagnosis.required() } else { diagnosis });
        fields.extend([
            FormField::new("symptoms", "Symptoms", FieldKind::TextArea),
            FormField::new("treatment", "Treatment", FieldKind::TextArea),
            notes(),
            FormField::new("nextAppointmentDate", "Next appointment", FieldKind::Date),
        ]);
        FormSchema::new(fields)
    };

    EntityConfig {
        title: "Medical Records",
        columns: vec![
            ColumnDef::new("patient", "Patient", |r: &MedicalRecord| {
                name_or_id(r.patient_name.as_deref(), &r.patient_id)
            })
            .searchable(),
            ColumnDef::new("doctor", "Doctor", |r: &MedicalRecord| CellValue::opt_text(r.doctor_name.as_deref())),
            ColumnDef::new("diagnosis", "Diagnosis", |r: &MedicalRecord| CellValue::text(&r.diagnosis))
                .render_as(CellRenderer::Truncate(40))
                .searchable(),
            ColumnDef::new("treatment", "Treatment", |r: &MedicalRecord| {
                CellValue::opt_text(r.treatment.as_deref())
            })
            .render_as(CellRenderer::Truncate(40)),
            ColumnDef::new("next", "Next appointment", |r: &MedicalRecord| {
                CellValue::opt_date(r.next_appointment_date)
            })
            .render_as(CellRenderer::Date),
            ColumnDef::new("created", "Created", |r: &MedicalRecord| {
                CellValue::opt_timestamp(r.created_at.as_deref())
            })
            .render_as(CellRenderer::DateTime),
        ],
        pagination: PaginationMode::Server,
        create_form: Some(fields(true)),
        edit_form: Some(fields(false)),
        shape_create: None,
        actions: |user, _| staff_edit_admin_delete(user, &[Role::Doctor]),
    }
}

// ─── Pharmacy orders ──────────────────────────────────────────────────────────

pub fn pharmacy_orders() -> EntityConfig<PharmacyOrder> {
    EntityConfig {
        title: "Pharmacy Orders",
        columns: vec![
            ColumnDef::new("patient", "Patient", |o: &PharmacyOrder| {
                name_or_id(o.patient_name.as_deref(), &o.patient_id)
            })
            .searchable(),
            ColumnDef::new("pharmacy", "Pharmacy", |o: &PharmacyOrder| CellValue::opt_text(o.pharmacy_name()))
                .searchable(),
            ColumnDef::new("medicine", "Medicine", |o: &PharmacyOrder| {
                name_or_id(o.medicine_name.as_deref(), &o.medicine_id)
            })
            .searchable(),
            ColumnDef::new("quantity", "Qty", |o: &PharmacyOrder| CellValue::Number(f64::from(o.quantity))),
            ColumnDef::new("total", "Total", |o: &PharmacyOrder| CellValue::Number(o.total_amount))
                .render_as(CellRenderer::Currency),
            ColumnDef::new("status", "Status", |o: &PharmacyOrder| CellValue::Status {
                label: o.status.as_str(),
                tone: o.status.tone(),
            })
            .render_as(CellRenderer::StatusPill)
            .searchable(),
            ColumnDef::new("created", "Ordered", |o: &PharmacyOrder| {
                CellValue::opt_timestamp(o.created_at.as_deref())
            })
            .render_as(CellRenderer::DateTime),
        ],
        pagination: PaginationMode::Client,
        create_form: Some(FormSchema::new(vec![
            FormField::new("patient_id", "Patient", FieldKind::Text).required(),
            FormField::new("doctor_id", "Pharmacy", FieldKind::Text),
            FormField::new("medicine_id", "Medicine", FieldKind::Text).required(),
            FormField::new("quantity", "Quantity", FieldKind::Number).required().min(1.0),
            FormField::new("total_amount", "Total amount", FieldKind::Number).required().positive(),
        ])),
        edit_form: Some(FormSchema::new(vec![
            FormField::select("status", "Status", OrderStatus::ALL.iter().map(|s| s.as_str())),
            FormField::new("quantity", "Quantity", FieldKind::Number).min(1.0),
            FormField::new("total_amount", "Total amount", FieldKind::Number).positive(),
        ])),
        shape_create: None,
        actions: order_actions,
    }
}

fn order_actions(user: Option<&AuthUser>, order: &PharmacyOrder) -> Vec<RowAction> {
    let mut actions = Vec::new();
    if can_pay(user, order) {
        actions.push(RowAction::Pay);
        if can_cancel_order(order) {
            actions.push(RowAction::Cancel);
        }
    }
    actions.extend(staff_edit_admin_delete(user, &[Role::Pharmacist]));
    actions
}
