//! Question classifications and the codes used for them in the spreadsheet

use thiserror::Error;

/// A coded cell held a value outside the known code set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{code}' is not a valid {kind}")]
pub struct UnknownCodeError {
    pub kind: &'static str,
    pub code: String,
}

/// Generates the exact, case-sensitive code table of a classification enum.
macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_code(code: &str) -> Result<Self, UnknownCodeError> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(UnknownCodeError {
                        kind: $kind,
                        code: code.to_string(),
                    }),
                }
            }

            pub fn as_code(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_code())
            }
        }
    };
}

coded_enum!(
    /// Cognitive level a question tests, coded by a single letter
    QuestionDimension, "question dimension", {
        Remember => "O",
        Understand => "B",
        Apply => "T",
        Integrate => "I",
    }
);

coded_enum!(
    /// Answer format of a question, coded by a single letter
    QuestionType, "question type", {
        MultipleChoice => "M",
        Open => "O",
        TrueFalse => "J",
    }
);

coded_enum!(
    /// Subject area a question belongs to, spelled out in full
    QuestionDomain, "question domain", {
        Numbers => "Getallen",
        Algebra => "Algebra",
        Geometry => "Meetkunde",
        Statistics => "Statistiek",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_codes() {
        assert_eq!(QuestionDimension::from_code("T"), Ok(QuestionDimension::Apply));
        assert_eq!(QuestionType::from_code("M"), Ok(QuestionType::MultipleChoice));
        assert_eq!(QuestionDomain::from_code("Meetkunde"), Ok(QuestionDomain::Geometry));
    }

    #[test]
    fn test_decode_is_exact() {
        let err = QuestionDimension::from_code("t").unwrap_err();
        assert_eq!(err.kind, "question dimension");
        assert_eq!(err.code, "t");
        assert!(QuestionType::from_code(" M").is_err());
        assert!(QuestionDomain::from_code("algebra").is_err());
        assert!(QuestionDomain::from_code("Alg").is_err());
    }

    #[test]
    fn test_codes_round_trip_for_storage() {
        for d in QuestionDomain::ALL {
            assert_eq!(QuestionDomain::from_code(d.as_code()), Ok(*d));
        }
        for t in QuestionType::ALL {
            assert_eq!(QuestionType::from_code(&t.to_string()), Ok(*t));
        }
    }
}
