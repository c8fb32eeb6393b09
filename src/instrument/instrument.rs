use serde::{Deserialize, Serialize};

//represents a tradable instrument (currency or crypto pair)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    //pair identifier (eg EUR_USD)
    pub name: String,

    //instrument type as quoted by the broker (eg CURRENCY)
    pub ins_type: String,

    //human readable name (eg EUR/USD)
    pub display_name: String,

    //smallest quoted price increment, 10^pipLocation (-4 -> 0.0001)
    pub pip_scale: f64,

    //fraction of notional required as margin
    pub margin_rate: f64,
}

impl Instrument {
    pub fn new(
        name: String,
        ins_type: String,
        display_name: String,
        pip_location: i32,
        margin_rate: f64,
    ) -> Self {
        Instrument {
            name,
            ins_type,
            display_name,
            pip_scale: 10f64.powi(pip_location),
            margin_rate,
        }
    }

    //converts a price difference to pips
    pub fn price_to_pips(&self, price_diff: f64) -> f64 {
        price_diff / self.pip_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pip_scale_is_power_of_ten() {
        let eur = Instrument::new(
            "EUR_USD".to_string(),
            "CURRENCY".to_string(),
            "EUR/USD".to_string(),
            -4,
            0.0333,
        );
        assert_relative_eq!(eur.pip_scale, 0.0001);
        assert_relative_eq!(eur.price_to_pips(0.0025), 25.0, epsilon = 1e-9);

        let btc = Instrument::new(
            "BTC_USD".to_string(),
            "CRYPTO".to_string(),
            "BTC/USD".to_string(),
            0,
            0.5,
        );
        assert_relative_eq!(btc.pip_scale, 1.0);
    }
}
