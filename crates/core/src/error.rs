//! Conversion of domain errors into the application error taxonomy.

use reporthub_shared::AppError;

use crate::access::AccessError;
use crate::export::ExportError;
use crate::fields::FieldError;
use crate::import::ImportError;
use crate::location::LocationError;
use crate::planning::PlanningError;
use crate::reporting::ReportError;

macro_rules! into_app_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for AppError {
                fn from(err: $ty) -> Self {
                    Self::Domain {
                        status: err.status_code(),
                        code: err.error_code(),
                        message: err.to_string(),
                    }
                }
            }
        )+
    };
}

into_app_error!(
    AccessError,
    ExportError,
    FieldError,
    ImportError,
    LocationError,
    PlanningError,
    ReportError,
);
