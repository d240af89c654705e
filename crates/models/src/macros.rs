/// Implements `Serialize`/`Deserialize` by delegating to the type's
/// `JsonModel` wire form, so serde sees exactly what `to_json` writes and
/// validates exactly what `from_json` validates.
macro_rules! serde_via_json {
    ($name:ty) => {
        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serde::Serialize::serialize(&$crate::JsonModel::to_json(self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::JsonModel>::from_json(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}
