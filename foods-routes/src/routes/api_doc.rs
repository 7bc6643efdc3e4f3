pub mod examples {
    use serde_json::{Value, json};
    use std::sync::LazyLock;

    pub mod purchase {
        use super::*;

        static REQUEST: LazyLock<Value> = LazyLock::new(|| {
            json!({
                "foodId": "66f1c2a9e4b0a1b2c3d4e5f6",
                "quantity": 2,
                "buyer_email": "buyer@example.com",
                "buyer_name": "Buyer",
                "foodName": "Kacchi Biryani",
                "price": 12.5,
                "buyingDate": "2026-10-16",
            })
        });

        pub fn request() -> &'static Value {
            &REQUEST
        }

        static CREATED: LazyLock<Value> = LazyLock::new(|| {
            json!({
                "purchase": {
                    "id": "66f1c3b0e4b0a1b2c3d4e5f7",
                    "foodId": "66f1c2a9e4b0a1b2c3d4e5f6",
                    "quantity": 2,
                    "buyer_email": "buyer@example.com",
                    "buyer_name": "Buyer",
                    "foodName": "Kacchi Biryani",
                    "price": 12.5,
                    "buyingDate": "2026-10-16",
                },
                "food": {
                    "id": "66f1c2a9e4b0a1b2c3d4e5f6",
                    "name": "Kacchi Biryani",
                    "price": 12.5,
                    "quantity": 8,
                    "numberOfPurchases": 4,
                    "addedBy": { "name": "Chef", "email": "chef@example.com" },
                    "category": "rice",
                    "origin": "Bangladesh",
                },
            })
        });

        pub fn created() -> &'static Value {
            &CREATED
        }
    }
}
