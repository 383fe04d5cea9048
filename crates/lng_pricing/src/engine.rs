//! Cargo P&L pricing engine.
//!
//! ## Algorithm
//!
//! For a cargo of purchase volume `V` delivered in month `m`:
//!
//! ```text
//! purchase   = (HH + differential) * V
//! benchmark  = slope * Brent + constant + premium     (Brent-linked)
//!            = JKM(m + 1) + premium                   (JKM-linked)
//! arrival    = V * (1 - boil_off)^voyage_days
//! sold       = min(arrival, sales_max)
//! revenue    = sold * benchmark * seasonal            (price adjustment)
//! credit     = PD * (1 - R) * revenue
//! net        = revenue - purchase - freight - credit
//! ```
//!
//! Freight itemises base charter, insurance on cargo value, brokerage,
//! working-capital carry over voyage plus payment delay, carbon, expected
//! demurrage, LC fee, destination fees and any capped surcharge.
//!
//! Pricing is pure: the same request, inputs and ledger always give the same
//! breakdown, and invalid inputs fail with a typed [`PricingError`].

use crate::inputs::PriceInputs;
use crate::ledger::SurchargeLedger;
use lng_config::{
    Buyer, CreditTerms, DemandModel, Destination, PriceLinkage, StrandedVolumePolicy,
    TradingConfig,
};
use lng_core::types::{
    BuyerId, ConstraintViolation, DeliveryMonth, DestinationId, PriceFactor, PricingError,
};
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.0;

/// One cargo to be priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoRequest {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Destination
    pub destination: DestinationId,
    /// Buyer
    pub buyer: BuyerId,
    /// Purchase volume (MMBtu)
    pub purchase_volume: f64,
}

/// Itemised freight and voyage costs (USD).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FreightBreakdown {
    /// Charter rate times voyage days
    pub base: f64,
    /// Insurance on cargo value
    pub insurance: f64,
    /// Brokerage on base freight
    pub brokerage: f64,
    /// Working-capital carry on base freight
    pub working_capital: f64,
    /// Carbon cost
    pub carbon: f64,
    /// Expected demurrage
    pub demurrage: f64,
    /// Letter-of-credit fee
    pub lc_fee: f64,
    /// Terminal tariff and port fee
    pub destination_fees: f64,
    /// Window-controlled destination surcharge
    pub surcharge: f64,
}

impl FreightBreakdown {
    /// Sum of every component.
    pub fn total(&self) -> f64 {
        self.base
            + self.insurance
            + self.brokerage
            + self.working_capital
            + self.carbon
            + self.demurrage
            + self.lc_fee
            + self.destination_fees
            + self.surcharge
    }
}

/// Itemised P&L for one cargo.
///
/// `net_pnl == revenue - purchase_cost - freight.total() - credit_loss`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlBreakdown {
    /// Delivery month
    pub month: DeliveryMonth,
    /// Destination
    pub destination: DestinationId,
    /// Buyer
    pub buyer: BuyerId,
    /// Purchase volume (MMBtu)
    pub purchase_volume: f64,
    /// Volume arriving after boil-off
    pub arrival_volume: f64,
    /// Volume sold (arrival capped at the sales maximum)
    pub sold_volume: f64,
    /// Arrival volume above the sales maximum
    pub stranded_volume: f64,
    /// Set when stranded volume is positive
    pub stranded: bool,
    /// Volume lost to boil-off
    pub boil_off_volume: f64,
    /// Boil-off volume valued at the realised price
    pub boil_off_value: f64,
    /// Linked benchmark plus premium ($/MMBtu)
    pub benchmark_price: f64,
    /// Price after demand adjustment ($/MMBtu)
    pub realised_price: f64,
    /// Purchase cost
    pub purchase_cost: f64,
    /// Sale revenue
    pub revenue: f64,
    /// Freight components
    pub freight: FreightBreakdown,
    /// Expected credit loss
    pub credit_loss: f64,
    /// Revenue difference versus an unadjusted sale
    pub demand_adjustment: f64,
    /// Net P&L
    pub net_pnl: f64,
}

/// Prices cargoes against an immutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct CargoPricer<'a> {
    config: &'a TradingConfig,
}

impl<'a> CargoPricer<'a> {
    /// Creates a pricer.
    pub fn new(config: &'a TradingConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &'a TradingConfig {
        self.config
    }

    /// P&L of cancelling a month: `-tolling_fee * nominal_volume`.
    pub fn cancellation_pnl(&self) -> f64 {
        -self.config.contract.tolling_fee * self.config.contract.nominal_volume
    }

    /// Resolves and cross-checks the destination and buyer of a request.
    pub fn resolve(
        &self,
        destination: &DestinationId,
        buyer: &BuyerId,
    ) -> Result<(&'a Destination, &'a Buyer), PricingError> {
        let dest = self
            .config
            .destination(destination)
            .ok_or_else(|| PricingError::UnknownDestination(destination.clone()))?;
        let b = self
            .config
            .buyer(buyer)
            .ok_or_else(|| PricingError::UnknownBuyer(buyer.clone()))?;
        if b.destination != dest.id {
            return Err(PricingError::BuyerDestinationMismatch {
                buyer: b.id.clone(),
                affiliated: b.destination.clone(),
                destination: dest.id.clone(),
            });
        }
        Ok((dest, b))
    }

    /// Checks contract volume constraints for a candidate.
    ///
    /// Purchase volume must lie in the purchase band and arrival volume must
    /// reach the sales minimum. Under [`StrandedVolumePolicy::Reject`] the
    /// arrival volume must also stay within the sales maximum.
    pub fn check_volume(
        &self,
        purchase_volume: f64,
        voyage_days: u32,
    ) -> Result<(), ConstraintViolation> {
        let contract = &self.config.contract;
        if !contract.purchase_bounds.contains(purchase_volume) {
            return Err(ConstraintViolation::PurchaseVolumeOutOfBounds {
                volume: purchase_volume,
                min: contract.purchase_bounds.min,
                max: contract.purchase_bounds.max,
            });
        }
        let arrival = arrival_volume(purchase_volume, contract.boil_off_rate, voyage_days);
        if arrival < contract.sales_bounds.min {
            return Err(ConstraintViolation::SalesVolumeBelowMinimum {
                volume: arrival,
                min: contract.sales_bounds.min,
            });
        }
        if self.config.stranded_volume_policy == StrandedVolumePolicy::Reject
            && arrival > contract.sales_bounds.max
        {
            return Err(ConstraintViolation::StrandedVolume {
                excess: arrival - contract.sales_bounds.max,
                max: contract.sales_bounds.max,
            });
        }
        Ok(())
    }

    /// Prices one cargo.
    ///
    /// # Errors
    ///
    /// - `UnknownDestination` / `UnknownBuyer` for ids not in the configuration
    /// - `BuyerDestinationMismatch` when the buyer trades elsewhere
    /// - `NegativeVolume` for a negative or non-finite purchase volume
    /// - `InvalidPrice` / `MissingForecast` for unusable price inputs
    /// - `Constraint(StrandedVolume)` under the `Reject` stranded policy
    pub fn price(
        &self,
        request: &CargoRequest,
        inputs: &PriceInputs,
        ledger: &SurchargeLedger,
    ) -> Result<PnlBreakdown, PricingError> {
        let (dest, buyer) = self.resolve(&request.destination, &request.buyer)?;
        let month = request.month;
        let volume = request.purchase_volume;
        if !volume.is_finite() || volume < 0.0 {
            return Err(PricingError::NegativeVolume {
                month,
                destination: dest.id.clone(),
                buyer: buyer.id.clone(),
                volume,
            });
        }
        inputs.check(month)?;

        let contract = &self.config.contract;
        let costs = &self.config.costs;
        let days = dest.voyage_days as f64;

        // Purchase
        let purchase_cost = (inputs.henry_hub + contract.henry_hub_differential) * volume;

        // Benchmark
        let benchmark_price = benchmark(dest, buyer, month, inputs)?;

        // Boil-off and sales cap
        let arrival = arrival_volume(volume, contract.boil_off_rate, dest.voyage_days);
        let sold_volume = arrival.min(contract.sales_bounds.max);
        let stranded_volume = (arrival - sold_volume).max(0.0);
        if stranded_volume > 0.0 && self.config.stranded_volume_policy == StrandedVolumePolicy::Reject
        {
            return Err(ConstraintViolation::StrandedVolume {
                excess: stranded_volume,
                max: contract.sales_bounds.max,
            }
            .into());
        }

        // Demand
        let seasonal = dest.seasonal_factor(month);
        let unadjusted = sold_volume * benchmark_price;
        let (realised_price, revenue) = match self.config.demand_model {
            DemandModel::PriceAdjustment => {
                let price = benchmark_price * seasonal;
                (price, sold_volume * price)
            }
            DemandModel::ProbabilityOfSale => (benchmark_price, unadjusted * seasonal),
        };
        let demand_adjustment = revenue - unadjusted;

        // Freight
        let base = inputs.freight_rate * days;
        let freight = FreightBreakdown {
            base,
            insurance: costs.insurance_rate * purchase_cost,
            brokerage: costs.brokerage_rate * base,
            working_capital: costs.working_capital_rate
                * base
                * (days + dest.payment_delay_days as f64)
                / DAYS_PER_YEAR,
            carbon: dest.carbon.cost(days),
            demurrage: costs.demurrage.expected_cost(),
            lc_fee: costs.lc_fee,
            destination_fees: dest.fees.to_usd(dest.fees.terminal_tariff, inputs.fx) * sold_volume
                + dest.fees.to_usd(dest.fees.port_fee, inputs.fx),
            surcharge: ledger.quote(dest, month, &contract.vessel_flag),
        };

        // Credit
        let credit_loss = self.credit_terms(buyer).loss_fraction() * revenue;

        // Net
        let net_pnl = revenue - purchase_cost - freight.total() - credit_loss;

        let boil_off_volume = volume - arrival;
        Ok(PnlBreakdown {
            month,
            destination: dest.id.clone(),
            buyer: buyer.id.clone(),
            purchase_volume: volume,
            arrival_volume: arrival,
            sold_volume,
            stranded_volume,
            stranded: stranded_volume > 0.0,
            boil_off_volume,
            boil_off_value: boil_off_volume * realised_price,
            benchmark_price,
            realised_price,
            purchase_cost,
            revenue,
            freight,
            credit_loss,
            demand_adjustment,
            net_pnl,
        })
    }

    /// Resolved credit terms for a buyer.
    pub fn credit_terms(&self, buyer: &Buyer) -> CreditTerms {
        self.config.credit_terms(buyer)
    }
}

/// Arrival volume after daily compounding boil-off.
///
/// # Examples
///
/// ```
/// use lng_pricing::engine::arrival_volume;
///
/// let arrival = arrival_volume(4_170_082.0, 0.0005, 48);
/// assert!((arrival - 4_071_000.0).abs() < 1_000.0);
/// assert_eq!(arrival_volume(1_000.0, 0.0, 365), 1_000.0);
/// ```
pub fn arrival_volume(purchase_volume: f64, boil_off_rate: f64, voyage_days: u32) -> f64 {
    let retained = 1.0 - boil_off_rate;
    let factor = match i32::try_from(voyage_days) {
        Ok(days) => retained.powi(days),
        Err(_) => retained.powf(f64::from(voyage_days)),
    };
    purchase_volume * factor
}

fn benchmark(
    dest: &Destination,
    buyer: &Buyer,
    month: DeliveryMonth,
    inputs: &PriceInputs,
) -> Result<f64, PricingError> {
    let base = match dest.linkage {
        PriceLinkage::Brent { slope, constant } => slope * inputs.brent + constant,
        PriceLinkage::JkmNextMonth => {
            inputs
                .jkm_next_month
                .ok_or(PricingError::MissingForecast {
                    month: month.next(),
                    factor: PriceFactor::Jkm,
                })?
        }
    };
    Ok(base + buyer.premium)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::reference_market;
    use approx::assert_relative_eq;
    use lng_config::reference_config;

    fn m(y: i32, mo: u32) -> DeliveryMonth {
        DeliveryMonth::new(y, mo).unwrap()
    }

    fn request(dest: &str, buyer: &str, month: DeliveryMonth, volume: f64) -> CargoRequest {
        CargoRequest {
            month,
            destination: DestinationId::new(dest),
            buyer: BuyerId::new(buyer),
            purchase_volume: volume,
        }
    }

    fn inputs(month: DeliveryMonth) -> PriceInputs {
        reference_market()
            .forecast_set()
            .unwrap()
            .inputs(month)
            .unwrap()
    }

    // ================================================================
    // Worked examples
    // ================================================================

    #[test]
    fn test_singapore_48_day_boil_off() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let pnl = pricer
            .price(
                &request("Singapore", "SG-Trader", nov, 4_170_082.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap();
        assert_relative_eq!(
            pnl.arrival_volume / pnl.purchase_volume,
            0.9995_f64.powi(48),
            epsilon = 1e-12
        );
        assert!((pnl.arrival_volume - 4_071_000.0).abs() < 1_000.0);
        assert!(!pnl.stranded);
    }

    #[test]
    fn test_arrival_volume_never_exceeds_purchase_for_long_voyages() {
        let arrival = arrival_volume(1_000.0, 0.0005, u32::MAX);
        assert!((0.0..=1_000.0).contains(&arrival));
        assert_relative_eq!(arrival_volume(1_000.0, 0.0, u32::MAX), 1_000.0);
        assert_relative_eq!(
            arrival_volume(1_000.0, 0.0005, i32::MAX as u32 + 1),
            arrival_volume(1_000.0, 0.0005, i32::MAX as u32),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_cancellation_pnl() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        assert_relative_eq!(pricer.cancellation_pnl(), -5_700_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_brent_linked_itemisation() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let pnl = pricer
            .price(
                &request("Singapore", "SG-Trader", nov, 3_800_000.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap();

        // 0.128 * 78 + 0.5 + 1.1
        assert_relative_eq!(pnl.benchmark_price, 11.584, epsilon = 1e-12);
        // November seasonal factor is 1.0
        assert_relative_eq!(pnl.realised_price, 11.584, epsilon = 1e-12);
        assert_relative_eq!(pnl.purchase_cost, 6.1 * 3_800_000.0, epsilon = 1e-6);
        assert_relative_eq!(pnl.freight.base, 65_000.0 * 48.0, epsilon = 1e-6);
        assert_relative_eq!(
            pnl.freight.working_capital,
            0.06 * 65_000.0 * 48.0 * 78.0 / 365.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(pnl.freight.demurrage, 22_500.0, epsilon = 1e-9);
        assert_relative_eq!(
            pnl.credit_loss,
            0.003 * 0.65 * pnl.revenue,
            epsilon = 1e-6
        );
        assert_eq!(pnl.freight.surcharge, 0.0);
    }

    #[test]
    fn test_jkm_linked_uses_next_month_and_local_fees() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let pnl = pricer
            .price(
                &request("Japan", "JP-Utility", nov, 3_800_000.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap();
        // December JKM 12.60 + 0.3 premium
        assert_relative_eq!(pnl.benchmark_price, 12.9, epsilon = 1e-12);
        assert_relative_eq!(pnl.realised_price, 12.9 * 1.03, epsilon = 1e-12);
        let expected_fees = 60.0 / 150.0 * pnl.sold_volume + 22_500_000.0 / 150.0;
        assert_relative_eq!(pnl.freight.destination_fees, expected_fees, epsilon = 1e-6);
        assert!(pnl.demand_adjustment > 0.0);
    }

    #[test]
    fn test_missing_jkm_next_month_only_hurts_jkm_destinations() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let apr = m(2026, 4);
        let mut snapshot = inputs(apr);
        snapshot.jkm_next_month = None;
        let ledger = SurchargeLedger::new();

        let err = pricer
            .price(&request("Japan", "JP-Trader", apr, 3_800_000.0), &snapshot, &ledger)
            .unwrap_err();
        assert_eq!(
            err,
            PricingError::MissingForecast {
                month: m(2026, 5),
                factor: PriceFactor::Jkm
            }
        );
        assert!(pricer
            .price(&request("China", "CN-Major", apr, 3_800_000.0), &snapshot, &ledger)
            .is_ok());
    }

    #[test]
    fn test_surcharge_read_from_ledger() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let dec = m(2025, 12);
        let req = request("China", "CN-Major", dec, 3_800_000.0);
        let mut ledger = SurchargeLedger::new();
        let first = pricer.price(&req, &inputs(dec), &ledger).unwrap();
        assert_eq!(first.freight.surcharge, 1_000_000.0);

        let china = config.destination(&req.destination).unwrap();
        for _ in 0..5 {
            ledger.record(china, dec, "US");
        }
        let spent = pricer.price(&req, &inputs(dec), &ledger).unwrap();
        assert_eq!(spent.freight.surcharge, 0.0);
        assert_relative_eq!(
            spent.net_pnl - first.net_pnl,
            1_000_000.0,
            epsilon = 1e-6
        );
    }

    // ================================================================
    // Failure modes
    // ================================================================

    #[test]
    fn test_buyer_destination_mismatch() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let err = pricer
            .price(
                &request("Japan", "SG-Utility", nov, 3_800_000.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap_err();
        assert!(matches!(err, PricingError::BuyerDestinationMismatch { .. }));
    }

    #[test]
    fn test_unknown_ids() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let ledger = SurchargeLedger::new();
        assert!(matches!(
            pricer.price(&request("Korea", "SG-Utility", nov, 1.0), &inputs(nov), &ledger),
            Err(PricingError::UnknownDestination(_))
        ));
        assert!(matches!(
            pricer.price(&request("Japan", "Nobody", nov, 1.0), &inputs(nov), &ledger),
            Err(PricingError::UnknownBuyer(_))
        ));
    }

    #[test]
    fn test_negative_volume() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let err = pricer
            .price(
                &request("China", "CN-Major", nov, -10.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap_err();
        assert!(matches!(err, PricingError::NegativeVolume { volume, .. } if volume == -10.0));
    }

    #[test]
    fn test_negative_price_rejected() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        let nov = m(2025, 11);
        let bad = inputs(nov).map(PriceFactor::HenryHub, |_| -0.5);
        assert!(matches!(
            pricer.price(
                &request("China", "CN-Major", nov, 3_800_000.0),
                &bad,
                &SurchargeLedger::new()
            ),
            Err(PricingError::InvalidPrice { .. })
        ));
    }

    // ================================================================
    // Policies
    // ================================================================

    #[test]
    fn test_stranded_volume_cap_and_reject() {
        let mut config = reference_config();
        let nov = m(2025, 11);
        // Japan is 30 days: 4.18M * 0.9995^30 exceeds the 4.1M sales maximum
        let req = request("Japan", "JP-Trader", nov, 4_180_000.0);

        let capped = CargoPricer::new(&config)
            .price(&req, &inputs(nov), &SurchargeLedger::new())
            .unwrap();
        assert!(capped.stranded);
        assert_relative_eq!(capped.sold_volume, 4_100_000.0, epsilon = 1e-6);
        assert_relative_eq!(
            capped.stranded_volume,
            capped.arrival_volume - 4_100_000.0,
            epsilon = 1e-6
        );

        config.stranded_volume_policy = StrandedVolumePolicy::Reject;
        let pricer = CargoPricer::new(&config);
        assert!(matches!(
            pricer.price(&req, &inputs(nov), &SurchargeLedger::new()),
            Err(PricingError::Constraint(ConstraintViolation::StrandedVolume { .. }))
        ));
        assert!(pricer.check_volume(4_180_000.0, 30).is_err());
        assert!(pricer.check_volume(4_180_000.0, 48).is_ok());
    }

    #[test]
    fn test_probability_of_sale_scales_revenue() {
        let mut config = reference_config();
        config.demand_model = DemandModel::ProbabilityOfSale;
        for d in &mut config.destinations {
            d.seasonal_demand = [0.9; 12];
        }
        let nov = m(2025, 11);
        let pnl = CargoPricer::new(&config)
            .price(
                &request("Singapore", "SG-Utility", nov, 3_800_000.0),
                &inputs(nov),
                &SurchargeLedger::new(),
            )
            .unwrap();
        assert_relative_eq!(pnl.realised_price, pnl.benchmark_price, epsilon = 1e-12);
        assert_relative_eq!(
            pnl.revenue,
            0.9 * pnl.sold_volume * pnl.benchmark_price,
            epsilon = 1e-6
        );
        assert!(pnl.demand_adjustment < 0.0);
    }

    #[test]
    fn test_volume_bounds() {
        let config = reference_config();
        let pricer = CargoPricer::new(&config);
        assert!(matches!(
            pricer.check_volume(5_000_000.0, 30),
            Err(ConstraintViolation::PurchaseVolumeOutOfBounds { .. })
        ));
        let mut tight = reference_config();
        tight.contract.sales_bounds.min = 3_700_000.0;
        assert!(matches!(
            CargoPricer::new(&tight).check_volume(3_800_000.0, 48),
            Err(ConstraintViolation::SalesVolumeBelowMinimum { .. })
        ));
    }
}
