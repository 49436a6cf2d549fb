use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;

/// Shown in place of the supporter when the webhook carries no email.
pub const ANONYMOUS_SUPPORTER: &str = "Somebody";

/// Buy Me A Coffee purchase webhook body.
///
/// Decoding is lenient in the same ways the platform's own clients are:
/// keys match case-insensitively, a repeated key overwrites the earlier
/// value, `null` leaves a field untouched and unknown keys are skipped.
/// Numeric values arrive as strings and are relayed untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseEvent {
    pub response: PurchaseDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseDetails {
    pub supporter_email: String,
    pub number_of_coffees: String,
    pub total_amount: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PurchaseParseError {
    #[error("empty request body")]
    Empty,

    #[error("invalid purchase payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl PurchaseEvent {
    /// Decode the first JSON value in `body`. Anything after it is ignored.
    pub fn from_slice(body: &[u8]) -> Result<Self, PurchaseParseError> {
        let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Self>();

        match values.next() {
            Some(value) => Ok(value?),
            None => Err(PurchaseParseError::Empty),
        }
    }

    pub fn supporter(&self) -> &str {
        match self.response.supporter_email.as_str() {
            "" => ANONYMOUS_SUPPORTER,
            email => email,
        }
    }

    pub fn number_of_coffees(&self) -> &str {
        &self.response.number_of_coffees
    }

    pub fn total_amount(&self) -> &str {
        &self.response.total_amount
    }

    // TODO: distinguish coffee purchases from other purchase kinds once their
    // payload shape is known; everything is worded as coffee for now.
    pub fn notification_text(&self) -> String {
        format!(
            "{} bought {} coffee(s) for ${}",
            self.supporter(),
            self.number_of_coffees(),
            self.total_amount()
        )
    }
}

impl<'de> Deserialize<'de> for PurchaseEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut event = PurchaseEvent::default();
        MergeEvent(&mut event).deserialize(deserializer)?;
        Ok(event)
    }
}

/// Decodes a JSON object into an existing value, so repeated keys merge.
struct MergeEvent<'a>(&'a mut PurchaseEvent);

struct MergeDetails<'a>(&'a mut PurchaseDetails);

impl<'de> DeserializeSeed<'de> for MergeEvent<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de> Visitor<'de> for MergeEvent<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a purchase webhook object")
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            match key.to_lowercase().as_str() {
                "response" => map.next_value_seed(MergeDetails(&mut self.0.response))?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(())
    }
}

impl<'de> DeserializeSeed<'de> for MergeDetails<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_option(self)
    }
}

impl<'de> Visitor<'de> for MergeDetails<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a purchase details object")
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        while let Some(key) = map.next_key::<String>()? {
            let field = match key.to_lowercase().as_str() {
                "supporter_email" => &mut self.0.supporter_email,
                "number_of_coffees" => &mut self.0.number_of_coffees,
                "total_amount" => &mut self.0.total_amount,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
            };
            if let Some(value) = map.next_value::<Option<String>>()? {
                *field = value;
            }
        }
        Ok(())
    }
}
