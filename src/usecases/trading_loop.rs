//! Trading Loop - Polling Orchestration of the Spread Strategy
//!
//! The single sequential control thread of the bot. Each cycle:
//! 1. Gate on the trading session schedule (closed → long backoff)
//! 2. Fetch both last prices and a fresh portfolio snapshot
//! 3. Invoke the spread engine on the assembled state
//! 4. Execute the resulting action, selling before buying
//! 5. Sleep the poll interval and repeat
//!
//! Every port call goes through the resilient retry wrapper; an exhausted
//! call abandons the dependent step of the current cycle, never the
//! process. The buy leg of a rebalance is sized only after the sell is
//! confirmed and cash has been re-queried — snapshots are never reused
//! across a mutating order.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use tokio::sync::broadcast;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::domain::engine::{RebalanceAction, SpreadEngine, affordable_lots};
use crate::domain::instrument::{AccountId, InstrumentRef, PairInstruments, PairLeg};
use crate::domain::portfolio::PairHoldings;
use crate::domain::schedule::SessionSchedule;
use crate::domain::spread::SpreadQuote;
use crate::ports::market_data::MarketData;
use crate::ports::orders::{OrderGateway, OrderReceipt, OrderRequest, OrderSide};
use crate::ports::portfolio::PortfolioSource;

use super::retry::{RetryExhausted, RetryPolicy, retrying};

/// Sleep intervals governing the loop's cadence.
#[derive(Debug, Clone, Copy)]
pub struct LoopIntervals {
    /// Pause between trading cycles while the session is open.
    pub poll: Duration,
    /// Pause between schedule re-checks while the session is closed.
    pub closed_backoff: Duration,
    /// Pause after an accepted order before dependent state is re-queried.
    pub settle_delay: Duration,
}

/// Which step of a cycle was abandoned after retry exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStage {
    /// A last-price fetch; the engine was never invoked.
    PriceFetch,
    /// The portfolio snapshot; the engine was never invoked.
    PortfolioFetch,
    /// The sell leg; the buy was not attempted.
    SellOrder,
    /// The post-sell price/cash re-query; the buy was not attempted.
    PostSellRequery,
    /// The buy leg.
    BuyOrder,
}

impl std::fmt::Display for CycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PriceFetch => write!(f, "price fetch"),
            Self::PortfolioFetch => write!(f, "portfolio fetch"),
            Self::SellOrder => write!(f, "sell order"),
            Self::PostSellRequery => write!(f, "post-sell re-query"),
            Self::BuyOrder => write!(f, "buy order"),
        }
    }
}

/// What a single cycle ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No order was warranted this cycle.
    Held,
    /// A cash-only entry was executed.
    Bought {
        /// Leg bought into.
        leg: PairLeg,
        /// Lots bought.
        lots: u64,
    },
    /// A full sell-then-buy rebalance was executed.
    Rebalanced {
        /// Leg sold out of.
        sold_leg: PairLeg,
        /// Lots sold.
        sold_lots: u64,
        /// Leg bought into.
        bought_leg: PairLeg,
        /// Lots bought from post-sell cash.
        bought_lots: u64,
    },
    /// The sell went through but post-sell cash affords no buy lots.
    BuySkipped {
        /// Leg the buy targeted.
        leg: PairLeg,
    },
    /// A step was abandoned after retry exhaustion.
    Abandoned {
        /// The abandoned step.
        stage: CycleStage,
    },
}

/// The polling trading loop, generic over its three brokerage ports.
pub struct TradingLoop<M: MarketData, P: PortfolioSource, O: OrderGateway> {
    /// Last-price port.
    market: Arc<M>,
    /// Portfolio snapshot port.
    portfolio: Arc<P>,
    /// Order submission port.
    orders: Arc<O>,
    /// The pure decision engine.
    engine: SpreadEngine,
    /// The resolved instrument pair.
    pair: PairInstruments,
    /// Account all orders and queries run against.
    account_id: AccountId,
    /// Weekday/session gating.
    schedule: SessionSchedule,
    /// Retry policy applied to every port call.
    retry: RetryPolicy,
    /// Loop cadence.
    intervals: LoopIntervals,
    /// Shutdown signal receiver.
    shutdown_rx: broadcast::Receiver<()>,
}

impl<M: MarketData, P: PortfolioSource, O: OrderGateway> TradingLoop<M, P, O> {
    /// Wire up a trading loop over the given ports and parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        market: Arc<M>,
        portfolio: Arc<P>,
        orders: Arc<O>,
        engine: SpreadEngine,
        pair: PairInstruments,
        account_id: AccountId,
        schedule: SessionSchedule,
        retry: RetryPolicy,
        intervals: LoopIntervals,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            market,
            portfolio,
            orders,
            engine,
            pair,
            account_id,
            schedule,
            retry,
            intervals,
            shutdown_rx,
        }
    }

    /// Run until the shutdown signal fires.
    ///
    /// Any error escaping a cycle is caught here, reported, and the loop
    /// continues: availability over halting.
    pub async fn run(&mut self) -> Result<()> {
        info!(
            ordinary = %self.pair.ordinary.ticker,
            preferred = %self.pair.preferred.ticker,
            account = %self.account_id,
            "trading loop started"
        );

        loop {
            if !self.schedule.is_open_at(Local::now().naive_local()) {
                info!("trading session closed, backing off");
                if self.pause(self.intervals.closed_backoff).await {
                    break;
                }
                continue;
            }

            match self.run_cycle().await {
                Ok(outcome) => report_outcome(&outcome),
                Err(e) => warn!(error = %e, "cycle failed, continuing"),
            }

            if self.pause(self.intervals.poll).await {
                break;
            }
        }

        info!("trading loop stopped");
        Ok(())
    }

    /// Execute one full decision cycle.
    ///
    /// Public so integration tests can drive single cycles against mock
    /// ports without the polling sleeps.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        let ordinary_price = match retrying("ordinary last price", &self.retry, || {
            self.market.last_price(&self.pair.ordinary.id)
        })
        .await
        {
            Ok(price) => price,
            Err(_) => return Ok(CycleOutcome::Abandoned { stage: CycleStage::PriceFetch }),
        };

        let preferred_price = match retrying("preferred last price", &self.retry, || {
            self.market.last_price(&self.pair.preferred.id)
        })
        .await
        {
            Ok(price) => price,
            Err(_) => return Ok(CycleOutcome::Abandoned { stage: CycleStage::PriceFetch }),
        };

        let quote = SpreadQuote::new(ordinary_price, preferred_price);

        let snapshot = match retrying("portfolio snapshot", &self.retry, || {
            self.portfolio.snapshot(&self.account_id)
        })
        .await
        {
            Ok(snapshot) => snapshot,
            Err(_) => return Ok(CycleOutcome::Abandoned { stage: CycleStage::PortfolioFetch }),
        };

        let holdings = PairHoldings::of_pair(&snapshot, &self.pair);
        info!(
            spread = %quote.spread,
            ordinary_price = %quote.ordinary_price,
            preferred_price = %quote.preferred_price,
            cash = %snapshot.cash(),
            ordinary_held = holdings.ordinary,
            preferred_held = holdings.preferred,
            "cycle state"
        );
        if holdings.ordinary > 0 && holdings.preferred > 0 {
            warn!(
                ordinary_held = holdings.ordinary,
                preferred_held = holdings.preferred,
                "both legs held, classifying by larger exposure"
            );
        }

        let action = self.engine.decide(
            &quote,
            &holdings,
            snapshot.cash(),
            self.pair.ordinary.lot,
            self.pair.preferred.lot,
        );

        self.execute(action, &holdings).await
    }

    /// Execute the engine's action, selling before buying.
    async fn execute(
        &self,
        action: RebalanceAction,
        holdings: &PairHoldings,
    ) -> Result<CycleOutcome> {
        match action {
            RebalanceAction::Hold => Ok(CycleOutcome::Held),

            RebalanceAction::BuyOnly { target, lots } => {
                // A cash-only entry can stem from an unsellable sub-lot
                // residue on the opposite leg; report it like the sell path.
                let source = target.other();
                let source_instrument = self.pair.leg(source);
                let remainder = holdings.on(source) % u64::from(source_instrument.lot);
                if remainder > 0 {
                    warn!(
                        leg = %source,
                        units = remainder,
                        "sub-lot remainder stranded by truncation"
                    );
                }

                let instrument = self.pair.leg(target);
                match self.submit_order(instrument, lots, OrderSide::Buy).await {
                    Ok(_) => Ok(CycleOutcome::Bought { leg: target, lots }),
                    Err(_) => Ok(CycleOutcome::Abandoned { stage: CycleStage::BuyOrder }),
                }
            }

            RebalanceAction::SellThenBuy {
                sell_leg,
                sell_lots,
                buy_target,
            } => {
                let sell_instrument = self.pair.leg(sell_leg);
                let remainder = holdings.on(sell_leg) % u64::from(sell_instrument.lot);
                if remainder > 0 {
                    warn!(
                        leg = %sell_leg,
                        units = remainder,
                        "sub-lot remainder stranded by truncation"
                    );
                }

                if self
                    .submit_order(sell_instrument, sell_lots, OrderSide::Sell)
                    .await
                    .is_err()
                {
                    // Stale cash/position assumptions: the buy must not run.
                    return Ok(CycleOutcome::Abandoned { stage: CycleStage::SellOrder });
                }

                sleep(self.intervals.settle_delay).await;

                let buy_instrument = self.pair.leg(buy_target);
                let buy_price = match retrying("post-sell last price", &self.retry, || {
                    self.market.last_price(&buy_instrument.id)
                })
                .await
                {
                    Ok(price) => price,
                    Err(_) => {
                        return Ok(CycleOutcome::Abandoned { stage: CycleStage::PostSellRequery });
                    }
                };

                let post_sell = match retrying("post-sell portfolio snapshot", &self.retry, || {
                    self.portfolio.snapshot(&self.account_id)
                })
                .await
                {
                    Ok(snapshot) => snapshot,
                    Err(_) => {
                        return Ok(CycleOutcome::Abandoned { stage: CycleStage::PostSellRequery });
                    }
                };

                let buy_lots = affordable_lots(
                    post_sell.cash(),
                    buy_price,
                    buy_instrument.lot,
                    self.engine.cash_margin(),
                );
                if buy_lots == 0 {
                    info!(
                        leg = %buy_target,
                        cash = %post_sell.cash(),
                        price = %buy_price,
                        "post-sell cash affords no lots, skipping buy"
                    );
                    return Ok(CycleOutcome::BuySkipped { leg: buy_target });
                }

                match self
                    .submit_order(buy_instrument, buy_lots, OrderSide::Buy)
                    .await
                {
                    Ok(_) => Ok(CycleOutcome::Rebalanced {
                        sold_leg: sell_leg,
                        sold_lots: sell_lots,
                        bought_leg: buy_target,
                        bought_lots: buy_lots,
                    }),
                    Err(_) => Ok(CycleOutcome::Abandoned { stage: CycleStage::BuyOrder }),
                }
            }
        }
    }

    /// Submit one logical order under the retry policy.
    ///
    /// The idempotency id is generated once here and reused by every retry
    /// attempt, so a duplicate submission cannot double-execute.
    async fn submit_order(
        &self,
        instrument: &InstrumentRef,
        lots: u64,
        side: OrderSide,
    ) -> Result<OrderReceipt, RetryExhausted> {
        let order = OrderRequest::new(instrument.id.clone(), lots, side);
        let operation = format!("{side} {}", instrument.ticker);
        let receipt = retrying(&operation, &self.retry, || {
            self.orders.submit(&self.account_id, &order)
        })
        .await?;
        info!(
            order_id = %receipt.order_id,
            ticker = %instrument.ticker,
            lots,
            side = %side,
            status = %receipt.status,
            "order accepted"
        );
        Ok(receipt)
    }

    /// Sleep for `duration`, returning true if shutdown fired first.
    async fn pause(&mut self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.shutdown_rx.recv() => {
                info!("shutdown signal received");
                true
            }
            () = sleep(duration) => false,
        }
    }
}

/// Emit the per-cycle status line.
fn report_outcome(outcome: &CycleOutcome) {
    match outcome {
        CycleOutcome::Held => info!("holding current position"),
        CycleOutcome::Bought { leg, lots } => {
            info!(leg = %leg, lots, "entered position");
        }
        CycleOutcome::Rebalanced {
            sold_leg,
            sold_lots,
            bought_leg,
            bought_lots,
        } => {
            info!(
                sold = %sold_leg,
                sold_lots,
                bought = %bought_leg,
                bought_lots,
                "rebalanced"
            );
        }
        CycleOutcome::BuySkipped { leg } => {
            info!(leg = %leg, "rebalance sold but buy skipped");
        }
        CycleOutcome::Abandoned { stage } => {
            warn!(stage = %stage, "cycle step abandoned after retries");
        }
    }
}
