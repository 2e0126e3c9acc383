//! The transactional messages the platform sends.

/// A message to one recipient. Rendered to a subject line and a plain-text body.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Welcome {
        first_name: String,
        profile_url: String,
    },
    PasswordReset {
        first_name: String,
        reset_url: String,
    },
    OrderConfirmation {
        customer_name: String,
        order_id: i64,
        total: f64,
    },
    OrderShipped {
        customer_name: String,
        order_id: i64,
        tracking_number: Option<String>,
    },
    OrderDelivered {
        customer_name: String,
        order_id: i64,
    },
}

impl Notification {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Welcome { .. } => "welcome",
            Notification::PasswordReset { .. } => "password_reset",
            Notification::OrderConfirmation { .. } => "order_confirmation",
            Notification::OrderShipped { .. } => "order_shipped",
            Notification::OrderDelivered { .. } => "order_delivered",
        }
    }

    pub fn subject(&self) -> String {
        match self {
            Notification::Welcome { .. } => "Welcome to Inutile Cards".to_string(),
            Notification::PasswordReset { .. } => "Reset your password".to_string(),
            Notification::OrderConfirmation { order_id, .. } => {
                format!("Order #{order_id} confirmed")
            }
            Notification::OrderShipped { order_id, .. } => format!("Order #{order_id} shipped"),
            Notification::OrderDelivered { order_id, .. } => {
                format!("Order #{order_id} delivered")
            }
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::Welcome {
                first_name,
                profile_url,
            } => format!(
                "Hello {first_name},\n\n\
                 Your account is ready. Your public page lives at:\n{profile_url}\n\n\
                 Add your links and pick a theme to make it yours.\n"
            ),
            Notification::PasswordReset {
                first_name,
                reset_url,
            } => format!(
                "Hello {first_name},\n\n\
                 Someone asked to reset the password of your account. Open the link below \
                 within one hour to choose a new one:\n{reset_url}\n\n\
                 If this was not you, ignore this email.\n"
            ),
            Notification::OrderConfirmation {
                customer_name,
                order_id,
                total,
            } => format!(
                "Hello {customer_name},\n\n\
                 We received your order #{order_id} for a total of {total:.2} EUR.\n"
            ),
            Notification::OrderShipped {
                customer_name,
                order_id,
                tracking_number,
            } => {
                let tracking = tracking_number
                    .as_deref()
                    .map(|t| format!("Tracking number: {t}\n"))
                    .unwrap_or_default();
                format!(
                    "Hello {customer_name},\n\n\
                     Your order #{order_id} is on its way.\n{tracking}"
                )
            }
            Notification::OrderDelivered {
                customer_name,
                order_id,
            } => format!(
                "Hello {customer_name},\n\n\
                 Your order #{order_id} has been delivered. Tap your card on any phone to \
                 activate it.\n"
            ),
        }
    }
}
