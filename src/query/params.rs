//! # List Query Parameters
//!
//! Collects raw list-query parameters from URL query pairs. Values are kept
//! as strings; interpretation happens in the translator.

/// Raw parameters of a list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub place: Option<String>,
    pub gender: Option<String>,
    pub country_code: Option<String>,
    /// Multi-value; each `hobbies=` pair adds one value. Blank values are
    /// kept as given and match no record.
    pub hobbies: Vec<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    /// `field:direction`
    pub sort: Option<String>,
}

impl ListParams {
    /// Build parameters from decoded query pairs.
    ///
    /// Scalar keys repeated more than once keep the last value. Unknown keys
    /// are ignored. A single blank `hobbies=` applies no filter; any other
    /// form of the key (repeated, or `hobbies[]`) filters on its values as
    /// given.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = ListParams::default();
        let mut hobbies_as_list = false;

        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "search" => params.search = Some(value),
                "name" => params.name = Some(value),
                "email" => params.email = Some(value),
                "phone" => params.phone = Some(value),
                "place" => params.place = Some(value),
                "gender" => params.gender = Some(value),
                "countryCode" => params.country_code = Some(value),
                "hobbies" => params.hobbies.push(value),
                "hobbies[]" => {
                    hobbies_as_list = true;
                    params.hobbies.push(value);
                }
                "page" => params.page = Some(value),
                "limit" => params.limit = Some(value),
                "sort" => params.sort = Some(value),
                _ => {}
            }
        }

        let lone_blank = matches!(params.hobbies.as_slice(), [only] if only.trim().is_empty());
        if lone_blank && !hobbies_as_list {
            params.hobbies.clear();
        }

        params
    }

    pub fn with_hobby(mut self, hobby: impl Into<String>) -> Self {
        self.hobbies.push(hobby.into());
        self
    }

    pub fn with_page(mut self, page: u64, limit: u64) -> Self {
        self.page = Some(page.to_string());
        self.limit = Some(limit.to_string());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Parse the leading integer of a string, ignoring any trailing text.
///
/// `"12abc"` yields 12; `"abc"` and `""` yield `None`.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;

    Some(if negative { -magnitude } else { magnitude })
}
