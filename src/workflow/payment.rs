//! Pharmacy order payment: pre-filled payer form, initialization call,
//! redirect to the gateway checkout page.
//!
//! The final outcome is never known here. The gateway sends the user back
//! to `returnUrl`; `PaymentReturn` reads what it appended and the payments
//! screen can ask the backend to verify the reference.

use std::sync::Arc;

use reqwest::Url;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::inflight::InFlight;
use crate::interaction::{parse_external_url, Notifier, UrlOpener};
use crate::models::{AuthUser, Payment, PaymentInit, PaymentStatus, PaymentType, PharmacyOrder, Role};

/// Only patients pay, and only for orders still open.
pub fn can_pay(user: Option<&AuthUser>, order: &PharmacyOrder) -> bool {
    matches!(user, Some(u) if u.role == Role::Patient) && !order.status.is_closed()
}

/// Payer details shown in the payment modal.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub amount: f64,
    pub notes: String,
}

impl PaymentForm {
    /// Pre-fill from the signed-in profile and the order total.
    pub fn prefilled(user: &AuthUser, order: &PharmacyOrder) -> Self {
        Self {
            full_name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone.clone().unwrap_or_default(),
            amount: order.total_amount,
            notes: String::new(),
        }
    }

    /// Initialization payload for an order. The gateway returns the user
    /// to `current_page` when checkout ends.
    pub fn build_payload(&self, order_id: &str, current_page: &Url) -> PaymentInit {
        let mut return_url = current_page.clone();
        return_url.set_fragment(None);
        PaymentInit {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            amount: self.amount,
            payment_type: PaymentType::Order,
            order_id: Some(order_id.to_string()),
            appointment_id: None,
            notes: self.notes.trim().to_string(),
            return_url: return_url.to_string(),
        }
    }
}

/// Where the user was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRedirect {
    pub authorization_url: Url,
    pub reference: Option<String>,
}

/// Query parameters the gateway appends to `returnUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReturn {
    pub reference: String,
    pub status: Option<String>,
}

impl PaymentReturn {
    /// `None` when the page was not reached from a checkout redirect.
    pub fn from_url(url: &Url) -> Option<Self> {
        let mut reference = None;
        let mut status = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "reference" => reference = Some(value.into_owned()),
                "trxref" if reference.is_none() => reference = Some(value.into_owned()),
                "status" => status = Some(value.into_owned()),
                _ => {}
            }
        }
        reference
            .filter(|r| !r.trim().is_empty())
            .map(|reference| Self { reference, status })
    }
}

pub struct PaymentWorkflow {
    client: Arc<ApiClient>,
    opener: Arc<dyn UrlOpener>,
    notifier: Notifier,
    paying: InFlight,
}

impl PaymentWorkflow {
    pub fn new(client: Arc<ApiClient>, opener: Arc<dyn UrlOpener>, notifier: Notifier) -> Self {
        Self {
            client,
            opener,
            notifier,
            paying: InFlight::new(),
        }
    }

    /// Pay button spinner state.
    pub fn is_paying(&self) -> bool {
        self.paying.is_busy()
    }

    /// Modal contents for an order, or `None` when the Pay action is hidden.
    pub fn open_form(&self, order: &PharmacyOrder) -> Option<PaymentForm> {
        let user = self.client.session().current_user()?;
        can_pay(Some(&user), order).then(|| PaymentForm::prefilled(&user, order))
    }

    /// Submit the payment modal and open checkout in a new tab.
    ///
    /// Every failure ends as one error notification; the modal can be
    /// submitted again right away.
    pub async fn initiate(
        &self,
        form: &PaymentForm,
        order: &PharmacyOrder,
        current_page: &Url,
    ) -> Result<PaymentRedirect, ClientError> {
        let result = self.try_initiate(form, order, current_page).await;
        match &result {
            Ok(redirect) => {
                tracing::info!(order_id = %order.id, reference = ?redirect.reference, "Redirecting to checkout");
                self.notifier.info("Redirecting to the payment page...");
            }
            Err(err) => self.notifier.failure("initialize payment", err),
        }
        result
    }

    async fn try_initiate(
        &self,
        form: &PaymentForm,
        order: &PharmacyOrder,
        current_page: &Url,
    ) -> Result<PaymentRedirect, ClientError> {
        // Checked first so a signed-out user never triggers a request.
        self.client.session().token()?;

        if order.status.is_closed() {
            return Err(ClientError::ActionDisabled("order is completed or cancelled"));
        }
        let Some(_guard) = self.paying.try_acquire() else {
            return Err(ClientError::Busy);
        };

        let payload = form.build_payload(&order.id, current_page);
        let response = self.client.initialize_payment(&payload).await?;

        let raw = response.authorization_url().ok_or(ClientError::NoPaymentUrl)?;
        let authorization_url = parse_external_url(raw)?;
        self.opener.open(&authorization_url)?;

        Ok(PaymentRedirect {
            authorization_url,
            reference: response.reference().map(String::from),
        })
    }

    /// Handle a landing on `returnUrl`: verify the reference if present.
    pub async fn confirm_return(&self, url: &Url) -> Result<Option<Payment>, ClientError> {
        let Some(ret) = PaymentReturn::from_url(url) else {
            return Ok(None);
        };

        self.verify(&ret.reference).await.map(Some)
    }

    /// Ask the backend for the outcome of a checkout and report it.
    pub async fn verify(&self, reference: &str) -> Result<Payment, ClientError> {
        match self.client.verify_payment(reference).await {
            Ok(payment) => {
                match payment.status {
                    PaymentStatus::Success => self.notifier.success("Payment successful"),
                    PaymentStatus::Pending => self.notifier.info("Payment is still being processed"),
                    other => self.notifier.error(format!("Payment {}", other.as_str())),
                }
                Ok(payment)
            }
            Err(err) => {
                self.notifier.failure("verify payment", &err);
                Err(err)
            }
        }
    }
}
