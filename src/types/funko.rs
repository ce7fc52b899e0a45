use serde::{Deserialize, Serialize};

/// A collectible item record. Field names follow the crate's conventions;
/// serde renames keep the wire and on-disk keys of the original dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Funko {
    pub id: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "tipo")]
    pub category: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "franquicia")]
    pub franchise: String,
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "exclusivo")]
    pub is_exclusive: bool,
    #[serde(rename = "caracteristicas_especiales")]
    pub special_features: String,
    #[serde(rename = "valor_mercado")]
    pub market_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_original_wire_keys() {
        let funko = Funko {
            id: 1,
            name: "Batman".to_string(),
            description: "Caped crusader".to_string(),
            category: "Pop!".to_string(),
            genre: "Heroes".to_string(),
            franchise: "DC".to_string(),
            number: 144,
            is_exclusive: false,
            special_features: "Glows in the dark".to_string(),
            market_value: 25.5,
        };

        let value = serde_json::to_value(&funko).unwrap();
        assert_eq!(value["nombre"], "Batman");
        assert_eq!(value["tipo"], "Pop!");
        assert_eq!(value["caracteristicas_especiales"], "Glows in the dark");
        assert_eq!(value["valor_mercado"], 25.5);

        let back: Funko = serde_json::from_value(value).unwrap();
        assert_eq!(back, funko);
    }
}
